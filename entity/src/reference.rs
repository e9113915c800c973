//! Fixed choice lists offered by the creation form.

pub const DEPARTMENTS: [&str; 5] = [
    "Sales",
    "Marketing",
    "Engineering",
    "Human Resources",
    "Legal",
];

pub const STATES: [&str; 50] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

pub fn is_department(value: &str) -> bool {
    DEPARTMENTS.contains(&value)
}

pub fn is_state(value: &str) -> bool {
    STATES.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_exact() {
        assert!(is_state("New York"));
        assert!(!is_state("new york"));
        assert!(!is_state("NY"));
        assert!(is_department("Human Resources"));
        assert!(!is_department("Finance"));
    }
}
