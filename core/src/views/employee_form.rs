//! "Add New Employee" form state and client-side validation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::api::Api;
use crate::http::Transport;
use crate::types::NewEmployee;
use crate::views::DashboardEvent;

pub const DEPARTMENTS: [&str; 10] = [
    "IT",
    "HR",
    "Finance",
    "Marketing",
    "Operations",
    "Sales",
    "Engineering",
    "Design",
    "Legal",
    "Other",
];

pub const CREATE_FAILED: &str = "Failed to create employee. Please try again.";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EmployeeField {
    EmployeeCode,
    FirstName,
    LastName,
    Email,
    Department,
    Position,
    Salary,
    JoiningDate,
}

#[derive(Debug, Default, Clone)]
pub struct EmployeeForm {
    employee_code: String,
    first_name: String,
    last_name: String,
    email: String,
    department: String,
    position: String,
    salary: String,
    joining_date: String,
    errors: BTreeMap<EmployeeField, &'static str>,
    loading: bool,
    alert: Option<String>,
}

impl EmployeeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: EmployeeField) -> &str {
        match field {
            EmployeeField::EmployeeCode => &self.employee_code,
            EmployeeField::FirstName => &self.first_name,
            EmployeeField::LastName => &self.last_name,
            EmployeeField::Email => &self.email,
            EmployeeField::Department => &self.department,
            EmployeeField::Position => &self.position,
            EmployeeField::Salary => &self.salary,
            EmployeeField::JoiningDate => &self.joining_date,
        }
    }

    /// Update one field and clear its error.
    pub fn set(&mut self, field: EmployeeField, value: impl Into<String>) {
        let value = value.into();
        match field {
            EmployeeField::EmployeeCode => self.employee_code = value,
            EmployeeField::FirstName => self.first_name = value,
            EmployeeField::LastName => self.last_name = value,
            EmployeeField::Email => self.email = value,
            EmployeeField::Department => self.department = value,
            EmployeeField::Position => self.position = value,
            EmployeeField::Salary => self.salary = value,
            EmployeeField::JoiningDate => self.joining_date = value,
        }
        self.errors.remove(&field);
    }

    pub fn error(&self, field: EmployeeField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn errors(&self) -> &BTreeMap<EmployeeField, &'static str> {
        &self.errors
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message from the last failed submit.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Recompute every field error. Returns true when the form is clean.
    pub fn validate(&mut self) -> bool {
        let mut errors = BTreeMap::new();

        if self.employee_code.trim().is_empty() {
            errors.insert(EmployeeField::EmployeeCode, "Employee code is required");
        }
        if self.first_name.trim().is_empty() {
            errors.insert(EmployeeField::FirstName, "First name is required");
        }
        if self.last_name.trim().is_empty() {
            errors.insert(EmployeeField::LastName, "Last name is required");
        }
        if self.email.trim().is_empty() {
            errors.insert(EmployeeField::Email, "Email is required");
        } else if !EMAIL.is_match(&self.email) {
            errors.insert(EmployeeField::Email, "Email is invalid");
        }
        if self.department.is_empty() {
            errors.insert(EmployeeField::Department, "Department is required");
        } else if !DEPARTMENTS.contains(&self.department.as_str()) {
            errors.insert(EmployeeField::Department, "Select a listed department");
        }
        if self.position.trim().is_empty() {
            errors.insert(EmployeeField::Position, "Position is required");
        }
        if !matches!(parse_amount(&self.salary), Some(v) if v > 0.0) {
            errors.insert(EmployeeField::Salary, "Valid salary is required");
        }
        if self.joining_date.is_empty() {
            errors.insert(EmployeeField::JoiningDate, "Joining date is required");
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Payload for the create call. Only meaningful after `validate`.
    pub fn payload(&self) -> NewEmployee {
        NewEmployee {
            employee_code: self.employee_code.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            department: self.department.clone(),
            position: self.position.clone(),
            basic_salary: parse_amount(&self.salary).unwrap_or_default(),
            join_date: self.joining_date.clone(),
        }
    }

    pub fn submit<T: Transport>(&mut self, api: &Api<'_, T>) -> Option<DashboardEvent> {
        self.alert = None;
        if !self.validate() {
            return None;
        }

        self.loading = true;
        let result = api.create_employee(&self.payload());
        self.loading = false;

        match result {
            Ok(_) => {
                *self = Self::default();
                Some(DashboardEvent::CloseFormAndReload)
            }
            Err(e) => {
                warn!(error = %e, "employee creation failed");
                self.alert = Some(CREATE_FAILED.to_string());
                None
            }
        }
    }
}

pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
