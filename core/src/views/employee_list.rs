use tracing::warn;

use crate::api::Api;
use crate::format::{format_optional_currency, or_na, short_date};
use crate::http::Transport;
use crate::types::Employee;
use crate::views::DashboardEvent;

pub const CONFIRM_DELETE: &str =
    "Are you sure you want to delete this employee and all their salary records?";
pub const DELETE_SUCCEEDED: &str = "Employee and related records deleted successfully";
pub const DELETE_FAILED: &str = "Failed to delete employee";

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRow {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub salary: String,
    pub joined: String,
}

impl EmployeeRow {
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            code: or_na(&employee.employee_code).to_string(),
            name: employee.full_name(),
            email: or_na(&employee.email).to_string(),
            department: or_na(&employee.department).to_string(),
            position: or_na(&employee.position).to_string(),
            salary: format_optional_currency(employee.basic_salary),
            joined: employee
                .join_date
                .as_deref()
                .map(short_date)
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct EmployeeList {
    busy: Option<i64>,
    alert: Option<String>,
}

impl EmployeeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(employees: &[Employee]) -> Vec<EmployeeRow> {
        employees.iter().map(EmployeeRow::from_employee).collect()
    }

    pub fn heading(employees: &[Employee]) -> String {
        format!("Employee List ({})", employees.len())
    }

    /// Id of the row whose delete is in flight.
    pub fn busy(&self) -> Option<i64> {
        self.busy
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Cascade-delete `employee` and everything keyed by its code. Nothing
    /// happens unless the user has answered `CONFIRM_DELETE` with yes.
    pub fn cascade_delete<T: Transport>(
        &mut self,
        api: &Api<'_, T>,
        employee: &Employee,
        confirmed: bool,
    ) -> Option<DashboardEvent> {
        self.alert = None;
        if !confirmed {
            return None;
        }

        self.busy = Some(employee.id);
        let result = api.cascade_delete_employee(&employee.employee_code);
        self.busy = None;

        match result {
            Ok(_) => {
                self.alert = Some(DELETE_SUCCEEDED.to_string());
                Some(DashboardEvent::Reload)
            }
            Err(e) => {
                warn!(code = %employee.employee_code, error = %e, "cascade delete failed");
                self.alert = Some(DELETE_FAILED.to_string());
                None
            }
        }
    }
}
