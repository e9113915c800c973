//! Record types shared by the HR repository, the form layer and the server.

pub mod employee;
pub mod reference;

pub use employee::{Employee, NewEmployee};
pub use reference::{DEPARTMENTS, STATES};
