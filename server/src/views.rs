//! Server-rendered pages for the creation form and the employee listing.

use chrono::{Datelike, Utc};
use entity::{DEPARTMENTS, Employee, STATES};
use products_hr::{EmployeeForm, FormErrors};

const LISTING_COLUMNS: [&str; 9] = [
    "First Name",
    "Last Name",
    "Start Date",
    "Department",
    "Date of Birth",
    "Street",
    "City",
    "State",
    "Zip Code",
];

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>HRnet - {title}</title>\n\
         </head>\n\
         <body>\n\
         <header>\n\
         <a class=\"brand\" href=\"/\">HRnet</a>\n\
         <nav><a href=\"/current-employees\">View Current Employees</a></nav>\n\
         </header>\n\
         <main>\n{body}</main>\n\
         <footer><p>&copy; {year} Wealth Health. All rights reserved.</p></footer>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
        year = Utc::now().year(),
    )
}

/// The "Create Employee" page. `created` shows the confirmation dialog.
pub fn create_page(form: &EmployeeForm, errors: Option<&FormErrors>, created: bool) -> String {
    let field = |name: &str, label: &str, kind: &str| -> String {
        format!(
            "<label for=\"{name}\">{label}</label>\n\
             <input id=\"{name}\" name=\"{name}\" type=\"{kind}\" value=\"{value}\" required>\n{error}",
            value = escape(form.value(name)),
            error = error_line(errors, name),
        )
    };
    let select = |name: &str, label: &str, options: &[&str]| -> String {
        let current = form.value(name);
        let mut html = format!(
            "<label for=\"{name}\">{label}</label>\n\
             <select id=\"{name}\" name=\"{name}\" required>\n\
             <option value=\"\">Select...</option>\n"
        );
        for option in options {
            let selected = if *option == current { " selected" } else { "" };
            html.push_str(&format!(
                "<option value=\"{value}\"{selected}>{value}</option>\n",
                value = escape(option),
            ));
        }
        html.push_str("</select>\n");
        html.push_str(&error_line(errors, name));
        html
    };

    let mut body = String::from(
        "<h1>Create Employee</h1>\n\
         <form method=\"post\" action=\"/\" id=\"create-employee\">\n",
    );
    body.push_str(&field("firstName", "First Name", "text"));
    body.push_str(&field("lastName", "Last Name", "text"));
    body.push_str(&field("dateOfBirth", "Date of Birth", "date"));
    body.push_str(&field("startDate", "Start Date", "date"));
    body.push_str("<fieldset>\n<legend>Address</legend>\n");
    body.push_str(&field("street", "Street", "text"));
    body.push_str(&field("city", "City", "text"));
    body.push_str(&select("state", "State", &STATES[..]));
    body.push_str(&field("zipCode", "Zip Code", "text"));
    body.push_str("</fieldset>\n");
    body.push_str(&select("department", "Department", &DEPARTMENTS[..]));
    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");

    if created {
        body.push_str(
            "<dialog open id=\"confirmation\" aria-labelledby=\"confirmation-title\">\n\
             <p id=\"confirmation-title\">Employee Created!</p>\n\
             <a href=\"/\" role=\"button\">Close</a>\n\
             </dialog>\n",
        );
    }

    layout("Create Employee", &body)
}

fn error_line(errors: Option<&FormErrors>, name: &str) -> String {
    match errors.and_then(|errors| errors.get(name)) {
        Some(message) => format!(
            "<p class=\"error\" id=\"{name}-error\">{}</p>\n",
            escape(message)
        ),
        None => String::new(),
    }
}

/// The "Current Employees" page, one row per record in collection order.
pub fn listing_page(employees: &[Employee]) -> String {
    let mut body = String::from("<h1>Current Employees</h1>\n");
    if employees.is_empty() {
        body.push_str("<p>No employees found.</p>\n");
    } else {
        body.push_str("<table id=\"employee-table\">\n<thead>\n<tr>");
        for column in LISTING_COLUMNS {
            body.push_str(&format!("<th>{column}</th>"));
        }
        body.push_str("</tr>\n</thead>\n<tbody>\n");
        for employee in employees {
            let cells = [
                &employee.first_name,
                &employee.last_name,
                &employee.start_date,
                &employee.department,
                &employee.date_of_birth,
                &employee.street,
                &employee.city,
                &employee.state,
                &employee.zip_code,
            ];
            body.push_str(&format!("<tr data-id=\"{}\">", escape(&employee.id)));
            for cell in cells {
                body.push_str(&format!("<td>{}</td>", escape(cell)));
            }
            body.push_str("</tr>\n");
        }
        body.push_str("</tbody>\n</table>\n");
    }
    body.push_str("<a href=\"/\">Home</a>\n");
    layout("Current Employees", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: &str, first: &str, last: &str) -> Employee {
        Employee {
            id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            date_of_birth: "1990-01-01".into(),
            start_date: "2023-01-01".into(),
            street: "123 Main St".into(),
            city: "New York".into(),
            state: "New York".into(),
            zip_code: "10001".into(),
            department: "Engineering".into(),
        }
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn empty_listing_shows_placeholder_without_table() {
        let html = listing_page(&[]);
        assert!(html.contains("<h1>Current Employees</h1>"));
        assert!(html.contains("No employees found."));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn listing_renders_headers_and_rows_in_order() {
        let html = listing_page(&[employee("1", "John", "Doe"), employee("2", "Jane", "Smith")]);
        for column in LISTING_COLUMNS {
            assert!(html.contains(&format!("<th>{column}</th>")), "{column}");
        }
        assert_eq!(html.matches("<tr").count(), 3);
        let doe = html.find("<td>Doe</td>").unwrap();
        let smith = html.find("<td>Smith</td>").unwrap();
        assert!(doe < smith);
        assert!(!html.contains("No employees found."));
    }

    #[test]
    fn form_page_has_every_field_and_save_button() {
        let html = create_page(&EmployeeForm::default(), None, false);
        for (name, label) in products_hr::form::FIELDS {
            assert!(html.contains(&format!("<label for=\"{name}\">{label}</label>")), "{name}");
        }
        assert!(html.contains("<legend>Address</legend>"));
        assert!(html.contains("<button type=\"submit\">Save</button>"));
        assert_eq!(html.matches("<option value=\"").count(), 2 + STATES.len() + DEPARTMENTS.len());
        assert!(!html.contains("Employee Created!"));
    }

    #[test]
    fn every_page_shares_header_link_and_footer() {
        let year = Utc::now().year();
        for html in [
            create_page(&EmployeeForm::default(), None, false),
            listing_page(&[]),
        ] {
            let header = &html[html.find("<header>").unwrap()..html.find("</header>").unwrap()];
            assert!(header.contains("<a href=\"/current-employees\">View Current Employees</a>"));
            assert!(html.contains(&format!(
                "<footer><p>&copy; {year} Wealth Health. All rights reserved.</p></footer>"
            )));
        }
    }

    #[test]
    fn confirmation_dialog_is_shown_after_creation() {
        let html = create_page(&EmployeeForm::default(), None, true);
        assert!(html.contains("Employee Created!"));
        assert!(html.contains(">Close</a>"));
    }

    #[test]
    fn rejected_form_keeps_values_and_selection() {
        let form = EmployeeForm {
            first_name: "<Ann>".into(),
            state: "Texas".into(),
            ..EmployeeForm::default()
        };
        let errors = form.validate().unwrap_err();
        let html = create_page(&form, Some(&errors), false);
        assert!(html.contains("value=\"&lt;Ann&gt;\""));
        assert!(html.contains("<option value=\"Texas\" selected>Texas</option>"));
        assert!(html.contains("id=\"lastName-error\""));
        assert!(!html.contains("id=\"firstName-error\""));
    }
}
