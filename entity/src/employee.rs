use serde::{Deserialize, Serialize};

/// One employee profile as held by the repository and persisted under the
/// `employees` key.
///
/// Missing fields deserialize to empty strings so that records written by
/// older revisions (notably without `id`) still load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
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

/// Payload for adding an employee. The identifier is always assigned by the
/// repository.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewEmployee {
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

impl Employee {
    pub fn from_new(id: impl Into<String>, payload: NewEmployee) -> Self {
        let NewEmployee {
            first_name,
            last_name,
            date_of_birth,
            start_date,
            street,
            city,
            state,
            zip_code,
            department,
        } = payload;
        Self {
            id: id.into(),
            first_name,
            last_name,
            date_of_birth,
            start_date,
            street,
            city,
            state,
            zip_code,
            department,
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
