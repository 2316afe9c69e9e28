//! Employee form input and its field checks.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::model::{Department, Employee, EmployeeStatus, NewEmployee};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Issue {
    Required,
    Email,
    Min,
    Format,
    Range,
}

impl Issue {
    pub fn message(self) -> &'static str {
        match self {
            Issue::Required => "is required",
            Issue::Email => "must be a valid email address",
            Issue::Min => "must not be negative",
            Issue::Format => "has an invalid format",
            Issue::Range => "is out of range",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub issue: Issue,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.issue.message())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Error)]
#[error("invalid fields: {}", render(.fields))]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

fn render(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn has(&self, field: &str) -> bool {
        self.fields.iter().any(|error| error.field == field)
    }

    pub fn issue(&self, field: &str) -> Option<Issue> {
        self.fields
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.issue)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn single(field: &'static str, issue: Issue) -> Self {
        Self {
            fields: vec![FieldError { field, issue }],
        }
    }

    fn push(&mut self, field: &'static str, issue: Issue) {
        self.fields.push(FieldError { field, issue });
    }
}

/// Raw form values as typed by the user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub position: String,
    pub hire_date: String,
    pub salary: String,
    pub status: String,
}

impl Default for EmployeeForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            department: String::new(),
            position: String::new(),
            hire_date: String::new(),
            salary: String::new(),
            status: EmployeeStatus::Active.as_str().to_string(),
        }
    }
}

impl EmployeeForm {
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
            department: employee.department.as_str().to_string(),
            position: employee.position.clone(),
            hire_date: employee.hire_date.to_string(),
            salary: employee.salary.to_string(),
            status: employee.status.as_str().to_string(),
        }
    }

    /// Check every field and collect all failures, or build the record.
    pub fn validate(&self) -> Result<NewEmployee, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let first_name = required(&mut errors, "first_name", &self.first_name);
        let last_name = required(&mut errors, "last_name", &self.last_name);
        let email = required(&mut errors, "email", &self.email);
        if let Some(email) = email {
            if !looks_like_email(email) {
                errors.push("email", Issue::Email);
            }
        }
        let phone = required(&mut errors, "phone", &self.phone);
        let position = required(&mut errors, "position", &self.position);

        let department = required(&mut errors, "department", &self.department).and_then(|raw| {
            let parsed = raw.parse::<Department>().ok();
            if parsed.is_none() {
                errors.push("department", Issue::Format);
            }
            parsed
        });
        let status = required(&mut errors, "status", &self.status).and_then(|raw| {
            let parsed = raw.parse::<EmployeeStatus>().ok();
            if parsed.is_none() {
                errors.push("status", Issue::Format);
            }
            parsed
        });
        let hire_date = required(&mut errors, "hire_date", &self.hire_date).and_then(|raw| {
            let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
            if parsed.is_none() {
                errors.push("hire_date", Issue::Format);
            }
            parsed
        });
        let salary = required(&mut errors, "salary", &self.salary).and_then(|raw| {
            match raw.parse::<f64>() {
                Ok(value) if !value.is_finite() => {
                    errors.push("salary", Issue::Format);
                    None
                }
                Ok(value) if value < 0.0 => {
                    errors.push("salary", Issue::Min);
                    None
                }
                Ok(value) => Some(value),
                Err(_) => {
                    errors.push("salary", Issue::Format);
                    None
                }
            }
        });

        match (
            first_name,
            last_name,
            email,
            phone,
            department,
            position,
            hire_date,
            salary,
            status,
        ) {
            (
                Some(first_name),
                Some(last_name),
                Some(email),
                Some(phone),
                Some(department),
                Some(position),
                Some(hire_date),
                Some(salary),
                Some(status),
            ) if errors.is_empty() => Ok(NewEmployee {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                department,
                position: position.to_string(),
                hire_date,
                salary,
                status,
                avatar_url: None,
            }),
            _ => Err(errors),
        }
    }
}

fn required<'a>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &'a str,
) -> Option<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, Issue::Required);
        None
    } else {
        Some(trimmed)
    }
}

/// `local@domain.tld` with no whitespace.
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}
