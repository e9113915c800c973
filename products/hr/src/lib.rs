//! HR vertical slice.
//!
//! [`EmployeeRepository`] owns the authoritative employee list and mirrors it
//! into a [`platform_store::DurableStore`] after every change. The [`form`]
//! module validates creation form input before anything reaches the
//! repository.

pub mod form;
mod ids;
pub mod repository;

pub use form::{EmployeeForm, FormErrors};
pub use repository::{EMPLOYEES_KEY, EmployeeRepository};
