//! Per-screen view state.
//!
//! # Design
//! Each controller owns its form fields, validation errors, loading flags
//! and list data, and talks to the backends only through `Api`. Child
//! controllers (forms, lists) never reload data themselves; they return a
//! `DashboardEvent` and the owning dashboard performs the reload.

pub mod admin_dashboard;
pub mod employee_form;
pub mod employee_list;
pub mod hr_dashboard;
pub mod login;
pub mod payroll_form;
pub mod payroll_list;

pub use admin_dashboard::{AdminDashboard, AdminStats};
pub use employee_form::{EmployeeField, EmployeeForm};
pub use employee_list::EmployeeList;
pub use hr_dashboard::{HrDashboard, HrTotals};
pub use login::LoginView;
pub use payroll_form::{PayrollField, PayrollForm, SalarySummary};
pub use payroll_list::PayrollList;

use crate::types::{Role, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    AdminDashboard,
    HrDashboard,
}

/// Screen for the current session: none goes to login, otherwise the
/// dashboard matching the session's role.
pub fn route(session: Option<&Session>) -> Screen {
    match session.map(|s| s.role) {
        None => Screen::Login,
        Some(Role::Admin) => Screen::AdminDashboard,
        Some(Role::Hr) => Screen::HrDashboard,
    }
}

/// Request from a child controller to its dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Data changed; fetch again.
    Reload,
    /// A form was submitted; hide it and fetch again.
    CloseFormAndReload,
}
