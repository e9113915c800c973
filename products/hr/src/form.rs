//! Creation form input and its validation.
//!
//! The repository accepts any payload; this is the only place where the nine
//! fields are checked.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use entity::{NewEmployee, reference};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const REQUIRED: &str = "This field is required.";

/// Form field names paired with their labels, in display order.
pub const FIELDS: [(&str, &str); 9] = [
    ("firstName", "First Name"),
    ("lastName", "Last Name"),
    ("dateOfBirth", "Date of Birth"),
    ("startDate", "Start Date"),
    ("street", "Street"),
    ("city", "City"),
    ("state", "State"),
    ("zipCode", "Zip Code"),
    ("department", "Department"),
];

/// Raw values as submitted by the browser or an API client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub start_date: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub department: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Error)]
#[error("{} invalid field(s)", .fields.len())]
pub struct FormErrors {
    fields: BTreeMap<&'static str, String>,
}

impl FormErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl EmployeeForm {
    /// Value of a field by its form name.
    pub fn value(&self, field: &str) -> &str {
        match field {
            "firstName" => &self.first_name,
            "lastName" => &self.last_name,
            "dateOfBirth" => &self.date_of_birth,
            "startDate" => &self.start_date,
            "street" => &self.street,
            "city" => &self.city,
            "state" => &self.state,
            "zipCode" => &self.zip_code,
            "department" => &self.department,
            _ => "",
        }
    }

    /// Checks every field and returns the trimmed payload.
    pub fn validate(&self) -> Result<NewEmployee, FormErrors> {
        let mut errors = FormErrors::default();
        for (field, _) in FIELDS {
            if self.value(field).trim().is_empty() {
                errors.add(field, REQUIRED);
            }
        }

        for field in ["dateOfBirth", "startDate"] {
            let raw = self.value(field).trim();
            if !raw.is_empty() && NaiveDate::parse_from_str(raw, DATE_FORMAT).is_err() {
                errors.add(field, "Use the YYYY-MM-DD format.");
            }
        }

        let state = self.state.trim();
        if !state.is_empty() && !reference::is_state(state) {
            errors.add("state", "Choose a state from the list.");
        }
        let department = self.department.trim();
        if !department.is_empty() && !reference::is_department(department) {
            errors.add("department", "Choose a department from the list.");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewEmployee {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth: self.date_of_birth.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: state.to_string(),
            zip_code: self.zip_code.trim().to_string(),
            department: department.to_string(),
        })
    }
}
