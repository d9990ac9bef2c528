//! Payroll management screen (HR).

use std::{panic, thread};

use tracing::{info, warn};

use crate::api::Api;
use crate::error::ApiError;
use crate::format::format_currency;
use crate::http::Transport;
use crate::types::{Employee, PayrollStatus, Salary};
use crate::views::{DashboardEvent, PayrollForm, PayrollList};

pub const LOAD_FAILED: &str = "Failed to load payroll data";
pub const BULK_FAILED: &str = "Failed to generate bulk payroll";

/// Header cards above the payroll table.
#[derive(Debug, Clone, PartialEq)]
pub struct HrTotals {
    pub total_records: usize,
    pub draft: usize,
    pub paid: usize,
    pub total_amount: f64,
}

impl HrTotals {
    pub fn from_salaries(salaries: &[Salary]) -> Self {
        let count = |status: PayrollStatus| salaries.iter().filter(|s| s.status == status).count();
        Self {
            total_records: salaries.len(),
            draft: count(PayrollStatus::Draft),
            paid: count(PayrollStatus::Paid),
            total_amount: salaries.iter().map(|s| s.net_salary).sum(),
        }
    }

    pub fn total_amount_label(&self) -> String {
        format_currency(self.total_amount)
    }
}

#[derive(Debug, Clone)]
pub struct HrDashboard {
    salaries: Vec<Salary>,
    employees: Vec<Employee>,
    loading: bool,
    error: Option<String>,
    session_expired: bool,
    notice: Option<String>,
    show_form: bool,
    pub form: PayrollForm,
    pub list: PayrollList,
}

impl Default for HrDashboard {
    fn default() -> Self {
        Self {
            salaries: Vec::new(),
            employees: Vec::new(),
            loading: true,
            error: None,
            session_expired: false,
            notice: None,
            show_form: false,
            form: PayrollForm::new(),
            list: PayrollList::new(),
        }
    }
}

impl HrDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open<T: Transport + Sync>(api: &Api<'_, T>) -> Self {
        let mut dashboard = Self::new();
        dashboard.load(api);
        dashboard
    }

    pub fn salaries(&self) -> &[Salary] {
        &self.salaries
    }

    /// Employees offered by the payroll form's picker.
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

    /// Text returned by the last bulk generation.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_form_visible(&self) -> bool {
        self.show_form
    }

    pub fn toggle_form_label(&self) -> &'static str {
        if self.show_form {
            "Cancel"
        } else {
            "Process New Salary"
        }
    }

    pub fn toggle_form(&mut self) {
        self.show_form = !self.show_form;
    }

    pub fn totals(&self) -> HrTotals {
        HrTotals::from_salaries(&self.salaries)
    }

    /// Fetch salaries and employees on two scoped threads. Both must succeed
    /// or neither list is replaced.
    pub fn load<T: Transport + Sync>(&mut self, api: &Api<'_, T>) {
        self.loading = true;
        match fetch_both(api) {
            Ok((salaries, employees)) => {
                self.salaries = salaries;
                self.employees = employees;
                self.error = None;
                self.session_expired = false;
            }
            Err(e) => {
                warn!(error = %e, "loading payroll data failed");
                self.session_expired = matches!(e, ApiError::Unauthorized);
                self.error = Some(LOAD_FAILED.to_string());
            }
        }
        self.loading = false;
    }

    pub fn generate_bulk<T: Transport + Sync>(&mut self, api: &Api<'_, T>) {
        self.loading = true;
        match api.generate_bulk_payroll() {
            Ok(message) => {
                info!(%message, "bulk payroll generated");
                self.notice = Some(message);
                self.handle(DashboardEvent::Reload, api);
            }
            Err(e) => {
                warn!(error = %e, "bulk payroll generation failed");
                self.error = Some(BULK_FAILED.to_string());
            }
        }
        self.loading = false;
    }

    pub fn select_employee(&mut self, code: &str) {
        self.form.select_employee(code, &self.employees);
    }

    pub fn submit_form<T: Transport + Sync>(&mut self, api: &Api<'_, T>) {
        if let Some(event) = self.form.submit(api) {
            self.handle(event, api);
        }
    }

    pub fn update_status<T: Transport + Sync>(
        &mut self,
        api: &Api<'_, T>,
        salary_id: i64,
        target: PayrollStatus,
    ) {
        let Some(salary) = self.salaries.iter().find(|s| s.id == salary_id).cloned() else {
            return;
        };
        if let Some(event) = self.list.update_status(api, &salary, target) {
            self.handle(event, api);
        }
    }

    pub fn handle<T: Transport + Sync>(&mut self, event: DashboardEvent, api: &Api<'_, T>) {
        if event == DashboardEvent::CloseFormAndReload {
            self.show_form = false;
        }
        self.load(api);
    }
}

fn fetch_both<T: Transport + Sync>(
    api: &Api<'_, T>,
) -> Result<(Vec<Salary>, Vec<Employee>), ApiError> {
    thread::scope(|s| {
        let salaries = s.spawn(|| api.list_salaries());
        let employees = api.list_employees();
        let salaries = salaries.join().unwrap_or_else(|payload| panic::resume_unwind(payload));
        match (salaries, employees) {
            (Ok(salaries), Ok(employees)) => Ok((salaries, employees)),
            // A rejected token on either side outranks any other failure.
            (Err(ApiError::Unauthorized), _) | (_, Err(ApiError::Unauthorized)) => {
                Err(ApiError::Unauthorized)
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{test_config, ScriptedTransport};
    use crate::views::PayrollField;

    const SALARIES: &str = "http://payroll.test/api/payroll";
    const EMPLOYEES: &str = "http://employees.test/api/employees";
    const BULK: &str = "http://payroll.test/api/payroll/bulk";

    const ONE_EMPLOYEE: &str =
        r#"[{"id":1,"employeeCode":"E1","firstName":"Ada","lastName":"L","basicSalary":5000.0}]"#;
    const MIXED: &str = r#"[
        {"id":1,"employeeId":1,"employeeCode":"E1","basicSalary":5000.0,"netSalary":5500.0,"payPeriod":"2024-01-01","status":"DRAFT"},
        {"id":2,"employeeId":1,"employeeCode":"E1","basicSalary":5000.0,"netSalary":5500.5,"payPeriod":"2024-02-01","status":"PAID"},
        {"id":3,"employeeId":1,"employeeCode":"E1","basicSalary":5000.0,"netSalary":4000.0,"payPeriod":"2024-03-01","status":"CANCELLED"}
    ]"#;

    #[test]
    fn empty_salaries_give_zero_totals() {
        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, SALARIES, 200, "[]")
            .on(HttpMethod::Get, EMPLOYEES, 200, ONE_EMPLOYEE);
        let config = test_config();
        let api = Api::new(&transport, &config, Some("t"));
        let dashboard = HrDashboard::open(&api);

        assert_eq!(dashboard.employees().len(), 1);
        let totals = dashboard.totals();
        assert_eq!(
            totals,
            HrTotals {
                total_records: 0,
                draft: 0,
                paid: 0,
                total_amount: 0.0
            }
        );
        assert_eq!(totals.total_amount_label(), "$0");
    }

    #[test]
    fn totals_count_statuses_and_sum_net() {
        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, SALARIES, 200, MIXED)
            .on(HttpMethod::Get, EMPLOYEES, 200, ONE_EMPLOYEE);
        let config = test_config();
        let api = Api::new(&transport, &config, Some("t"));
        let totals = HrDashboard::open(&api).totals();
        assert_eq!(totals.total_records, 3);
        assert_eq!(totals.draft, 1);
        assert_eq!(totals.paid, 1);
        assert_eq!(totals.total_amount_label(), "$15,000.5");
    }

    #[test]
    fn load_fetches_both_lists() {
        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, SALARIES, 200, "[]")
            .on(HttpMethod::Get, EMPLOYEES, 200, "[]");
        let config = test_config();
        let api = Api::new(&transport, &config, Some("t"));
        HrDashboard::open(&api);

        let mut paths = transport.paths();
        paths.sort();
        assert_eq!(paths, vec![EMPLOYEES.to_string(), SALARIES.to_string()]);
    }

    #[test]
    fn either_failure_fails_the_whole_load() {
        let config = test_config();

        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, SALARIES, 200, MIXED)
            .on(HttpMethod::Get, EMPLOYEES, 500, "");
        let api = Api::new(&transport, &config, None);
        let dashboard = HrDashboard::open(&api);
        assert_eq!(dashboard.error(), Some(LOAD_FAILED));
        assert!(dashboard.salaries().is_empty());

        let transport = ScriptedTransport::new()
            .fail(HttpMethod::Get, SALARIES)
            .on(HttpMethod::Get, EMPLOYEES, 200, ONE_EMPLOYEE);
        let api = Api::new(&transport, &config, None);
        let dashboard = HrDashboard::open(&api);
        assert_eq!(dashboard.error(), Some(LOAD_FAILED));
        assert!(dashboard.employees().is_empty());
    }

    #[test]
    fn rejected_token_on_either_list_flags_expired_session() {
        let config = test_config();

        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, SALARIES, 500, "")
            .on(HttpMethod::Get, EMPLOYEES, 401, "");
        let api = Api::new(&transport, &config, Some("stale"));
        let dashboard = HrDashboard::open(&api);
        assert_eq!(dashboard.error(), Some(LOAD_FAILED));
        assert!(dashboard.is_session_expired());

        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, SALARIES, 401, "")
            .on(HttpMethod::Get, EMPLOYEES, 200, ONE_EMPLOYEE);
        let api = Api::new(&transport, &config, Some("stale"));
        assert!(HrDashboard::open(&api).is_session_expired());

        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, SALARIES, 500, "")
            .on(HttpMethod::Get, EMPLOYEES, 200, ONE_EMPLOYEE);
        let api = Api::new(&transport, &config, Some("t"));
        assert!(!HrDashboard::open(&api).is_session_expired());
    }

    #[test]
    fn bulk_generation_shows_message_and_reloads() {
        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, SALARIES, 200, "[]")
            .on(HttpMethod::Get, SALARIES, 200, MIXED)
            .on(HttpMethod::Get, EMPLOYEES, 200, ONE_EMPLOYEE)
            .on(
                HttpMethod::Post,
                BULK,
                200,
                "Bulk payroll generation completed successfully (transactional mode)",
            );
        let config = test_config();
        let api = Api::new(&transport, &config, Some("t"));
        let mut dashboard = HrDashboard::open(&api);
        assert!(dashboard.salaries().is_empty());

        dashboard.generate_bulk(&api);

        assert_eq!(
            dashboard.notice(),
            Some("Bulk payroll generation completed successfully (transactional mode)")
        );
        assert_eq!(dashboard.salaries().len(), 3);
        assert!(!dashboard.is_loading());
    }

    #[test]
    fn bulk_failure_sets_error_without_reload() {
        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, SALARIES, 200, "[]")
            .on(HttpMethod::Get, EMPLOYEES, 200, "[]")
            .on(HttpMethod::Post, BULK, 500, "");
        let config = test_config();
        let api = Api::new(&transport, &config, Some("t"));
        let mut dashboard = HrDashboard::open(&api);

        dashboard.generate_bulk(&api);

        assert_eq!(dashboard.error(), Some(BULK_FAILED));
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    fn processing_a_salary_closes_form_and_reloads() {
        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, SALARIES, 200, "[]")
            .on(HttpMethod::Get, EMPLOYEES, 200, ONE_EMPLOYEE)
            .on(
                HttpMethod::Post,
                SALARIES,
                200,
                r#"{"id":4,"employeeId":1,"employeeCode":"E1","basicSalary":5000.0,"netSalary":5000.0,"payPeriod":"2024-05-01","status":"DRAFT"}"#,
            );
        let config = test_config();
        let api = Api::new(&transport, &config, Some("t"));
        let mut dashboard = HrDashboard::open(&api);
        dashboard.toggle_form();
        dashboard.select_employee("E1");
        assert_eq!(dashboard.form.value(PayrollField::BasicSalary), "5000");
        dashboard.form.set(PayrollField::PayPeriod, "2024-05");

        dashboard.submit_form(&api);

        assert!(!dashboard.is_form_visible());
        assert_eq!(transport.requests().len(), 5);
    }

    #[test]
    fn status_update_reloads_on_success() {
        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, SALARIES, 200, MIXED)
            .on(HttpMethod::Get, EMPLOYEES, 200, ONE_EMPLOYEE)
            .on(
                HttpMethod::Put,
                "http://payroll.test/api/payroll/1/status/APPROVED",
                200,
                r#"{"id":1,"employeeId":1,"employeeCode":"E1","basicSalary":5000.0,"netSalary":5500.0,"payPeriod":"2024-01-01","status":"APPROVED"}"#,
            );
        let config = test_config();
        let api = Api::new(&transport, &config, Some("t"));
        let mut dashboard = HrDashboard::open(&api);

        dashboard.update_status(&api, 1, PayrollStatus::Approved);

        assert!(dashboard.list.alert().is_none());
        assert_eq!(transport.requests().len(), 5);
    }
}
