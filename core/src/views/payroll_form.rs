//! "Process New Salary" form.
//!
//! Net salary is computed here and sent precomputed; the payroll service
//! only cross-checks it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::api::Api;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{Employee, NewSalary, PayrollStatus};
use crate::views::employee_form::parse_amount;
use crate::views::DashboardEvent;

pub const PROCESS_FAILED: &str = "Failed to process salary. Please try again.";
pub const INVALID_DATA: &str = "Invalid data. Please check all fields and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PayrollField {
    EmployeeCode,
    BasicSalary,
    Allowances,
    Deductions,
    PayPeriod,
}

/// Live calculation shown under the form. Unparsable inputs count as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalarySummary {
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub net_salary: f64,
}

impl SalarySummary {
    pub fn is_visible(&self) -> bool {
        self.basic_salary > 0.0 || self.allowances > 0.0 || self.deductions > 0.0
    }
}

pub fn net_salary(basic_salary: f64, allowances: f64, deductions: f64) -> f64 {
    basic_salary + allowances - deductions
}

#[derive(Debug, Clone)]
pub struct PayrollForm {
    employee_code: String,
    basic_salary: String,
    allowances: String,
    deductions: String,
    pay_period: String,
    selected: Option<Employee>,
    errors: BTreeMap<PayrollField, &'static str>,
    loading: bool,
    alert: Option<String>,
}

impl Default for PayrollForm {
    fn default() -> Self {
        Self {
            employee_code: String::new(),
            basic_salary: String::new(),
            allowances: "0".to_string(),
            deductions: "0".to_string(),
            pay_period: String::new(),
            selected: None,
            errors: BTreeMap::new(),
            loading: false,
            alert: None,
        }
    }
}

impl PayrollForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: PayrollField) -> &str {
        match field {
            PayrollField::EmployeeCode => &self.employee_code,
            PayrollField::BasicSalary => &self.basic_salary,
            PayrollField::Allowances => &self.allowances,
            PayrollField::Deductions => &self.deductions,
            PayrollField::PayPeriod => &self.pay_period,
        }
    }

    pub fn selected_employee(&self) -> Option<&Employee> {
        self.selected.as_ref()
    }

    pub fn error(&self, field: PayrollField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn errors(&self) -> &BTreeMap<PayrollField, &'static str> {
        &self.errors
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Pick the employee by code. A known basic salary pre-fills the salary
    /// field; otherwise the current input is kept.
    pub fn select_employee(&mut self, code: &str, employees: &[Employee]) {
        let employee = employees.iter().find(|e| e.employee_code == code).cloned();
        if let Some(salary) = employee.as_ref().and_then(|e| e.basic_salary) {
            self.basic_salary = salary.to_string();
        }
        self.employee_code = code.to_string();
        self.selected = employee;
        self.errors.remove(&PayrollField::EmployeeCode);
    }

    /// Update a free-text field and clear its error. Use `select_employee`
    /// for the employee.
    pub fn set(&mut self, field: PayrollField, value: impl Into<String>) {
        let value = value.into();
        match field {
            PayrollField::EmployeeCode => self.employee_code = value,
            PayrollField::BasicSalary => self.basic_salary = value,
            PayrollField::Allowances => self.allowances = value,
            PayrollField::Deductions => self.deductions = value,
            PayrollField::PayPeriod => self.pay_period = value,
        }
        self.errors.remove(&field);
    }

    pub fn summary(&self) -> SalarySummary {
        let basic_salary = parse_amount(&self.basic_salary).unwrap_or(0.0);
        let allowances = parse_amount(&self.allowances).unwrap_or(0.0);
        let deductions = parse_amount(&self.deductions).unwrap_or(0.0);
        SalarySummary {
            basic_salary,
            allowances,
            deductions,
            net_salary: net_salary(basic_salary, allowances, deductions),
        }
    }

    pub fn validate(&mut self) -> bool {
        let mut errors = BTreeMap::new();

        if self.employee_code.is_empty() || self.selected.is_none() {
            errors.insert(PayrollField::EmployeeCode, "Employee is required");
        }
        if !matches!(parse_amount(&self.basic_salary), Some(v) if v > 0.0) {
            errors.insert(PayrollField::BasicSalary, "Valid basic salary is required");
        }
        match parse_amount(&self.allowances) {
            Some(v) if v < 0.0 => {
                errors.insert(PayrollField::Allowances, "Allowances cannot be negative");
            }
            None => {
                errors.insert(PayrollField::Allowances, "Allowances must be a number");
            }
            _ => {}
        }
        match parse_amount(&self.deductions) {
            Some(v) if v < 0.0 => {
                errors.insert(PayrollField::Deductions, "Deductions cannot be negative");
            }
            None => {
                errors.insert(PayrollField::Deductions, "Deductions must be a number");
            }
            _ => {}
        }
        if self.pay_period.is_empty() {
            errors.insert(PayrollField::PayPeriod, "Pay period is required");
        } else if self.pay_period_date().is_none() {
            errors.insert(PayrollField::PayPeriod, "Pay period must be in YYYY-MM format");
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// `YYYY-MM` -> first day of that month.
    fn pay_period_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&format!("{}-01", self.pay_period), "%Y-%m-%d").ok()
    }

    /// Payload for the create call; `None` until an employee is selected
    /// and the pay period parses.
    pub fn payload(&self) -> Option<NewSalary> {
        let employee = self.selected.as_ref()?;
        let pay_period = self.pay_period_date()?;
        let basic_salary = parse_amount(&self.basic_salary)?;
        let allowances = parse_amount(&self.allowances)?;
        let deductions = parse_amount(&self.deductions)?;
        Some(NewSalary {
            employee_id: employee.id,
            employee_code: self.employee_code.clone(),
            basic_salary,
            allowances,
            deductions,
            net_salary: net_salary(basic_salary, allowances, deductions),
            pay_period,
            status: PayrollStatus::Draft,
        })
    }

    pub fn submit<T: Transport>(&mut self, api: &Api<'_, T>) -> Option<DashboardEvent> {
        self.alert = None;
        if !self.validate() {
            return None;
        }
        let payload = self.payload()?;

        self.loading = true;
        let result = api.create_salary(&payload);
        self.loading = false;

        match result {
            Ok(_) => {
                *self = Self::default();
                Some(DashboardEvent::CloseFormAndReload)
            }
            Err(e) => {
                warn!(code = %payload.employee_code, error = %e, "salary submission failed");
                self.alert = Some(submission_error_text(&e));
                None
            }
        }
    }
}

/// Prefer the service's own message, then a hint for 400s.
fn submission_error_text(error: &ApiError) -> String {
    if let Some(message) = error.server_message() {
        return message;
    }
    if error.status() == Some(400) {
        return INVALID_DATA.to_string();
    }
    PROCESS_FAILED.to_string()
}
