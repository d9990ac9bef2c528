//! Domain DTOs for the employee and payroll services.
//!
//! # Design
//! These types mirror the backend JSON (camelCase) but are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift between the two.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An employee record as returned by the employee service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub employee_code: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating an employee. The server assigns `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub basic_salary: f64,
    pub join_date: String,
}

/// Lifecycle state of a salary record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollStatus {
    Draft,
    Approved,
    Paid,
    Cancelled,
}

impl PayrollStatus {
    pub const ALL: [PayrollStatus; 4] = [
        PayrollStatus::Draft,
        PayrollStatus::Approved,
        PayrollStatus::Paid,
        PayrollStatus::Cancelled,
    ];

    /// Wire form used in paths and JSON (`DRAFT`, `APPROVED`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            PayrollStatus::Draft => "DRAFT",
            PayrollStatus::Approved => "APPROVED",
            PayrollStatus::Paid => "PAID",
            PayrollStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PayrollStatus::Draft => "Draft",
            PayrollStatus::Approved => "Approved",
            PayrollStatus::Paid => "Paid",
            PayrollStatus::Cancelled => "Cancelled",
        }
    }

    /// Status changes the payroll list offers for a record in this state.
    ///
    /// Presentation only: the payroll service is the enforcement point and
    /// `PayrollClient::build_update_status` accepts any target.
    pub fn allowed_transitions(&self) -> &'static [PayrollStatus] {
        match self {
            PayrollStatus::Draft => &[PayrollStatus::Approved, PayrollStatus::Cancelled],
            PayrollStatus::Approved => &[PayrollStatus::Paid, PayrollStatus::Cancelled],
            PayrollStatus::Paid | PayrollStatus::Cancelled => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayrollStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PayrollStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown payroll status: {s}"))
    }
}

/// A salary record as returned by the payroll service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub id: i64,
    pub employee_id: i64,
    #[serde(default)]
    pub employee_code: String,
    pub basic_salary: f64,
    #[serde(default)]
    pub allowances: Option<f64>,
    #[serde(default)]
    pub deductions: Option<f64>,
    pub net_salary: f64,
    pub pay_period: NaiveDate,
    pub status: PayrollStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Payload for creating a salary record. `net_salary` is precomputed by the
/// caller and sent verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSalary {
    pub employee_id: i64,
    pub employee_code: String,
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub net_salary: f64,
    pub pay_period: NaiveDate,
    pub status: PayrollStatus,
}

/// Dashboard a session is routed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Hr,
}

impl Role {
    /// Role guessed from the submitted username: exactly `admin` is an
    /// administrator, everyone else is HR.
    pub fn expected_for(username: &str) -> Role {
        if username == "admin" {
            Role::Admin
        } else {
            Role::Hr
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Hr => "HR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The currently authenticated user.
///
/// `role` is inferred from the username at login time, not taken from any
/// server-issued claim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
}
