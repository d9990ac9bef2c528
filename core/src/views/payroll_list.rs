use tracing::{info, warn};

use crate::api::Api;
use crate::format::{format_currency, format_optional_currency, month_label, or_na};
use crate::http::Transport;
use crate::types::{PayrollStatus, Salary};
use crate::views::DashboardEvent;

pub const UPDATE_FAILED: &str = "Failed to update salary status";
pub const NO_ACTIONS: &str = "No actions";

/// Button text for moving a record to `target`. Nothing moves back to draft.
pub fn action_label(target: PayrollStatus) -> Option<&'static str> {
    match target {
        PayrollStatus::Approved => Some("Approve"),
        PayrollStatus::Cancelled => Some("Cancel"),
        PayrollStatus::Paid => Some("Mark Paid"),
        PayrollStatus::Draft => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayrollRow {
    pub id: i64,
    pub employee_code: String,
    pub period: String,
    pub basic_salary: String,
    pub allowances: String,
    pub deductions: String,
    pub net_salary: String,
    pub status: PayrollStatus,
    pub actions: Vec<(PayrollStatus, &'static str)>,
}

impl PayrollRow {
    pub fn from_salary(salary: &Salary) -> Self {
        Self {
            id: salary.id,
            employee_code: or_na(&salary.employee_code).to_string(),
            period: month_label(salary.pay_period),
            basic_salary: format_currency(salary.basic_salary),
            allowances: format_optional_currency(salary.allowances),
            deductions: format_optional_currency(salary.deductions),
            net_salary: format_currency(salary.net_salary),
            status: salary.status,
            actions: salary
                .status
                .allowed_transitions()
                .iter()
                .filter_map(|&target| action_label(target).map(|label| (target, label)))
                .collect(),
        }
    }

    /// The action cell as text; terminal records show `No actions`.
    pub fn actions_text(&self) -> String {
        if self.actions.is_empty() {
            return NO_ACTIONS.to_string();
        }
        self.actions
            .iter()
            .map(|(_, label)| *label)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[derive(Debug, Default, Clone)]
pub struct PayrollList {
    busy: Option<i64>,
    alert: Option<String>,
}

impl PayrollList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(salaries: &[Salary]) -> Vec<PayrollRow> {
        salaries.iter().map(PayrollRow::from_salary).collect()
    }

    pub fn heading(salaries: &[Salary]) -> String {
        format!("Payroll Records ({})", salaries.len())
    }

    pub fn busy(&self) -> Option<i64> {
        self.busy
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Move `salary` to `target`. Only the transitions the row offers are
    /// sent; anything else is refused locally with no request.
    pub fn update_status<T: Transport>(
        &mut self,
        api: &Api<'_, T>,
        salary: &Salary,
        target: PayrollStatus,
    ) -> Option<DashboardEvent> {
        self.alert = None;
        if !salary.status.allowed_transitions().contains(&target) {
            warn!(id = salary.id, from = %salary.status, to = %target, "transition not offered");
            self.alert = Some(UPDATE_FAILED.to_string());
            return None;
        }

        self.busy = Some(salary.id);
        let result = api.update_salary_status(salary.id, target);
        self.busy = None;

        match result {
            Ok(updated) => {
                info!(id = updated.id, status = %updated.status, "salary status updated");
                Some(DashboardEvent::Reload)
            }
            Err(e) => {
                warn!(id = salary.id, error = %e, "status update failed");
                self.alert = Some(UPDATE_FAILED.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{test_config, ScriptedTransport};

    fn salary(status: PayrollStatus) -> Salary {
        Salary {
            id: 9,
            employee_id: 3,
            employee_code: "E3".to_string(),
            basic_salary: 5000.0,
            allowances: Some(1000.0),
            deductions: None,
            net_salary: 6000.0,
            pay_period: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status,
            created_at: None,
        }
    }

    #[test]
    fn rows_format_amounts_and_period() {
        let row = PayrollRow::from_salary(&salary(PayrollStatus::Draft));
        assert_eq!(row.period, "March 2024");
        assert_eq!(row.basic_salary, "$5,000");
        assert_eq!(row.deductions, "$0");
        assert_eq!(row.net_salary, "$6,000");
        assert_eq!(row.actions_text(), "Approve | Cancel");
    }

    #[test]
    fn terminal_rows_have_no_actions() {
        for status in [PayrollStatus::Paid, PayrollStatus::Cancelled] {
            let row = PayrollRow::from_salary(&salary(status));
            assert!(row.actions.is_empty());
            assert_eq!(row.actions_text(), NO_ACTIONS);
        }
        let approved = PayrollRow::from_salary(&salary(PayrollStatus::Approved));
        assert_eq!(approved.actions_text(), "Mark Paid | Cancel");
    }

    #[test]
    fn missing_code_shows_placeholder() {
        let mut record = salary(PayrollStatus::Draft);
        record.employee_code = String::new();
        assert_eq!(PayrollRow::from_salary(&record).employee_code, "N/A");
        assert_eq!(PayrollRow::from_salary(&salary(PayrollStatus::Draft)).employee_code, "E3");
    }

    #[test]
    fn no_row_offers_a_way_back_to_draft() {
        assert_eq!(action_label(PayrollStatus::Draft), None);
        for status in [
            PayrollStatus::Draft,
            PayrollStatus::Approved,
            PayrollStatus::Paid,
            PayrollStatus::Cancelled,
        ] {
            let row = PayrollRow::from_salary(&salary(status));
            assert!(row.actions.iter().all(|(target, _)| *target != PayrollStatus::Draft));
        }
    }

    #[test]
    fn heading_counts_records() {
        let salaries = vec![salary(PayrollStatus::Draft), salary(PayrollStatus::Paid)];
        assert_eq!(PayrollList::heading(&salaries), "Payroll Records (2)");
    }

    #[test]
    fn offered_transition_is_sent_and_reloads() {
        let body = serde_json::to_string(&salary(PayrollStatus::Approved)).unwrap();
        let transport = ScriptedTransport::new().on(
            HttpMethod::Put,
            "http://payroll.test/api/payroll/9/status/APPROVED",
            200,
            &body,
        );
        let config = test_config();
        let api = Api::new(&transport, &config, Some("t"));
        let mut list = PayrollList::new();

        assert_eq!(
            list.update_status(&api, &salary(PayrollStatus::Draft), PayrollStatus::Approved),
            Some(DashboardEvent::Reload)
        );
        assert!(list.alert().is_none());
        assert!(list.busy().is_none());
    }

    #[test]
    fn transition_not_offered_sends_nothing() {
        let transport = ScriptedTransport::new();
        let config = test_config();
        let api = Api::new(&transport, &config, None);
        let mut list = PayrollList::new();

        assert_eq!(
            list.update_status(&api, &salary(PayrollStatus::Paid), PayrollStatus::Draft),
            None
        );
        assert_eq!(list.alert(), Some(UPDATE_FAILED));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn server_failure_alerts() {
        let transport = ScriptedTransport::new().on(
            HttpMethod::Put,
            "http://payroll.test/api/payroll/9/status/PAID",
            500,
            "",
        );
        let config = test_config();
        let api = Api::new(&transport, &config, None);
        let mut list = PayrollList::new();
        assert_eq!(
            list.update_status(&api, &salary(PayrollStatus::Approved), PayrollStatus::Paid),
            None
        );
        assert_eq!(list.alert(), Some(UPDATE_FAILED));
    }
}
