//! Authenticated executor over the employee and payroll clients.
//!
//! `Api` pairs the stateless clients with a host `Transport` and the current
//! bearer token. Each method runs build, attach token, execute, parse. Views
//! receive it by reference and never touch the transport directly.

use tracing::debug;

use crate::config::AppConfig;
use crate::employee::EmployeeClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::payroll::PayrollClient;
use crate::rest::with_bearer;
use crate::types::{Employee, NewEmployee, NewSalary, PayrollStatus, Salary};

pub struct Api<'t, T: Transport> {
    transport: &'t T,
    employees: EmployeeClient,
    payroll: PayrollClient,
    token: Option<String>,
}

impl<'t, T: Transport> Api<'t, T> {
    pub fn new(transport: &'t T, config: &AppConfig, token: Option<&str>) -> Self {
        Self {
            transport,
            employees: EmployeeClient::new(&config.employee_service_url),
            payroll: PayrollClient::new(&config.payroll_service_url),
            token: token.map(str::to_string),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let request = with_bearer(request, self.token.as_deref());
        debug!(method = request.method.as_str(), url = %request.path, "request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "response");
        Ok(response)
    }

    // --- employee service ---

    pub fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        let response = self.send(self.employees.build_list())?;
        self.employees.parse_list(response)
    }

    pub fn get_employee(&self, id: i64) -> Result<Employee, ApiError> {
        let response = self.send(self.employees.build_get(id))?;
        self.employees.parse_get(response)
    }

    pub fn get_employee_by_code(&self, code: &str) -> Result<Employee, ApiError> {
        let response = self.send(self.employees.build_get_by_code(code))?;
        self.employees.parse_get(response)
    }

    pub fn list_employees_by_department(&self, department: &str) -> Result<Vec<Employee>, ApiError> {
        let response = self.send(self.employees.build_list_by_department(department))?;
        self.employees.parse_list(response)
    }

    pub fn create_employee(&self, input: &NewEmployee) -> Result<Employee, ApiError> {
        let response = self.send(self.employees.build_create(input)?)?;
        self.employees.parse_create(response)
    }

    pub fn delete_employee(&self, id: i64) -> Result<(), ApiError> {
        let response = self.send(self.employees.build_delete(id))?;
        self.employees.parse_delete(response)
    }

    pub fn cascade_delete_employee(&self, code: &str) -> Result<String, ApiError> {
        let response = self.send(self.employees.build_cascade_delete(code))?;
        self.employees.parse_cascade_delete(response)
    }

    // --- payroll service ---

    pub fn list_salaries(&self) -> Result<Vec<Salary>, ApiError> {
        let response = self.send(self.payroll.build_list())?;
        self.payroll.parse_list(response)
    }

    pub fn list_salaries_by_employee(&self, employee_id: i64) -> Result<Vec<Salary>, ApiError> {
        let response = self.send(self.payroll.build_list_by_employee(employee_id))?;
        self.payroll.parse_list(response)
    }

    pub fn list_salaries_by_status(&self, status: PayrollStatus) -> Result<Vec<Salary>, ApiError> {
        let response = self.send(self.payroll.build_list_by_status(status))?;
        self.payroll.parse_list(response)
    }

    pub fn create_salary(&self, input: &NewSalary) -> Result<Salary, ApiError> {
        let response = self.send(self.payroll.build_create(input)?)?;
        self.payroll.parse_create(response)
    }

    pub fn update_salary_status(&self, id: i64, status: PayrollStatus) -> Result<Salary, ApiError> {
        let response = self.send(self.payroll.build_update_status(id, status))?;
        self.payroll.parse_update_status(response)
    }

    pub fn generate_bulk_payroll(&self) -> Result<String, ApiError> {
        let response = self.send(self.payroll.build_bulk_generate())?;
        self.payroll.parse_bulk_generate(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{test_config, ScriptedTransport};

    #[test]
    fn every_request_carries_the_bearer_token() {
        let transport = ScriptedTransport::new()
            .on(HttpMethod::Get, "http://employees.test/api/employees", 200, "[]")
            .on(HttpMethod::Post, "http://payroll.test/api/payroll/bulk", 200, "ok");
        let config = test_config();
        let api = Api::new(&transport, &config, Some("abc"));

        api.list_employees().unwrap();
        api.generate_bulk_payroll().unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        for request in requests {
            assert_eq!(request.header("authorization"), Some("Bearer abc"));
        }
    }

    #[test]
    fn anonymous_requests_have_no_authorization() {
        let transport =
            ScriptedTransport::new().on(HttpMethod::Get, "http://payroll.test/api/payroll", 200, "[]");
        let config = test_config();
        let api = Api::new(&transport, &config, None);
        api.list_salaries().unwrap();
        assert!(transport.requests()[0].header("authorization").is_none());
    }

    #[test]
    fn transport_errors_propagate_unchanged() {
        let transport =
            ScriptedTransport::new().fail(HttpMethod::Get, "http://employees.test/api/employees");
        let config = test_config();
        let api = Api::new(&transport, &config, None);
        let err = api.list_employees().unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(transport.requests().len(), 1);
    }
}
