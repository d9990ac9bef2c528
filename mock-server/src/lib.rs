//! In-memory stand-ins for the employee service and the payroll service.
//!
//! Both routers share one `Backend`, so a token issued by either login
//! endpoint is honoured by both, and the employee cascade delete can remove
//! payroll records directly.

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

mod auth;
mod employees;
mod payroll;

pub use employees::employee_app;
pub use payroll::payroll_app;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub basic_salary: Option<f64>,
    pub join_date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollStatus {
    Draft,
    Approved,
    Paid,
    Cancelled,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub id: i64,
    pub employee_id: i64,
    pub employee_code: String,
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub net_salary: f64,
    pub pay_period: NaiveDate,
    pub status: PayrollStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Default)]
pub struct Store {
    pub employees: BTreeMap<i64, Employee>,
    pub salaries: BTreeMap<i64, Salary>,
    tokens: HashSet<String>,
    next_employee_id: i64,
    next_salary_id: i64,
}

impl Store {
    pub fn employee_by_code(&self, code: &str) -> Option<&Employee> {
        self.employees.values().find(|e| e.employee_code == code)
    }

    fn next_employee_id(&mut self) -> i64 {
        self.next_employee_id += 1;
        self.next_employee_id
    }

    fn next_salary_id(&mut self) -> i64 {
        self.next_salary_id += 1;
        self.next_salary_id
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Drop every salary recorded under `code`; returns how many went.
    pub fn remove_salaries_for(&mut self, code: &str) -> usize {
        let before = self.salaries.len();
        self.salaries.retain(|_, s| s.employee_code != code);
        before - self.salaries.len()
    }
}

/// State shared by both services.
pub type Backend = Arc<RwLock<Store>>;

pub fn backend() -> Backend {
    Arc::new(RwLock::new(Store::default()))
}

/// Error responses. Rejections carry a JSON `message`; the rest are bare
/// status codes.
#[derive(Debug)]
pub enum Failure {
    BadRequest(String),
    Unauthorized,
    NotFound,
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        match self {
            Failure::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            Failure::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Failure::NotFound => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// Serve both services until either listener fails.
pub async fn run(
    employee_listener: TcpListener,
    payroll_listener: TcpListener,
) -> Result<(), std::io::Error> {
    let backend = backend();
    let employees = axum::serve(employee_listener, employee_app(backend.clone()));
    let payroll = axum::serve(payroll_listener, payroll_app(backend));
    tokio::try_join!(async { employees.await }, async { payroll.await })?;
    Ok(())
}
