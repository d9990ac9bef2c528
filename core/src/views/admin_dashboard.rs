//! Employee management screen (ADMIN).

use std::collections::HashSet;

use tracing::warn;

use crate::api::Api;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::Employee;
use crate::views::{DashboardEvent, EmployeeForm, EmployeeList};

pub const LOAD_FAILED: &str = "Failed to load employees";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminStats {
    pub total_employees: usize,
    pub departments: usize,
}

#[derive(Debug, Clone)]
pub struct AdminDashboard {
    employees: Vec<Employee>,
    loading: bool,
    error: Option<String>,
    session_expired: bool,
    show_form: bool,
    pub form: EmployeeForm,
    pub list: EmployeeList,
}

impl Default for AdminDashboard {
    fn default() -> Self {
        Self {
            employees: Vec::new(),
            loading: true,
            error: None,
            session_expired: false,
            show_form: false,
            form: EmployeeForm::new(),
            list: EmployeeList::new(),
        }
    }
}

impl AdminDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and load in one step, as mounting the screen does.
    pub fn open<T: Transport>(api: &Api<'_, T>) -> Self {
        let mut dashboard = Self::new();
        dashboard.load(api);
        dashboard
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The last load was refused with 401; the host should invalidate the
    /// session.
    pub fn is_session_expired(&self) -> bool {
        self.session_expired
    }

    pub fn is_form_visible(&self) -> bool {
        self.show_form
    }

    pub fn toggle_form_label(&self) -> &'static str {
        if self.show_form {
            "Cancel"
        } else {
            "Add New Employee"
        }
    }

    pub fn toggle_form(&mut self) {
        self.show_form = !self.show_form;
    }

    pub fn stats(&self) -> AdminStats {
        let departments: HashSet<&str> = self.employees.iter().map(|e| e.department.as_str()).collect();
        AdminStats {
            total_employees: self.employees.len(),
            departments: departments.len(),
        }
    }

    /// Fetch the employee list. A failure keeps the previous rows.
    pub fn load<T: Transport>(&mut self, api: &Api<'_, T>) {
        self.loading = true;
        match api.list_employees() {
            Ok(employees) => {
                self.employees = employees;
                self.error = None;
                self.session_expired = false;
            }
            Err(e) => {
                warn!(error = %e, "loading employees failed");
                self.session_expired = matches!(e, ApiError::Unauthorized);
                self.error = Some(LOAD_FAILED.to_string());
            }
        }
        self.loading = false;
    }

    pub fn submit_form<T: Transport>(&mut self, api: &Api<'_, T>) {
        if let Some(event) = self.form.submit(api) {
            self.handle(event, api);
        }
    }

    pub fn delete<T: Transport>(&mut self, api: &Api<'_, T>, employee_id: i64, confirmed: bool) {
        let Some(employee) = self.employees.iter().find(|e| e.id == employee_id).cloned() else {
            return;
        };
        if let Some(event) = self.list.cascade_delete(api, &employee, confirmed) {
            self.handle(event, api);
        }
    }

    pub fn handle<T: Transport>(&mut self, event: DashboardEvent, api: &Api<'_, T>) {
        if event == DashboardEvent::CloseFormAndReload {
            self.show_form = false;
        }
        self.load(api);
    }
}
