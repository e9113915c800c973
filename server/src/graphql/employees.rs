use async_graphql::{InputObject, SimpleObject};
use entity::Employee;
use products_hr::EmployeeForm;

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
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

impl From<Employee> for EmployeeNode {
    fn from(value: Employee) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            date_of_birth: value.date_of_birth,
            start_date: value.start_date,
            street: value.street,
            city: value.city,
            state: value.state,
            zip_code: value.zip_code,
            department: value.department,
        }
    }
}

/// Same fields as the creation form; checked by the same rules.
#[derive(Clone, Debug, InputObject)]
pub struct EmployeeInput {
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

impl From<EmployeeInput> for EmployeeForm {
    fn from(value: EmployeeInput) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            date_of_birth: value.date_of_birth,
            start_date: value.start_date,
            street: value.street,
            city: value.city,
            state: value.state,
            zip_code: value.zip_code,
            department: value.department,
        }
    }
}
