//! Request builder and response parser for the payroll service.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::rest::{decode_json, decode_text, RestClient};
use crate::types::{NewSalary, PayrollStatus, Salary};

#[derive(Debug, Clone)]
pub struct PayrollClient {
    rest: RestClient,
}

impl PayrollClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            rest: RestClient::new(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.rest.base_url()
    }

    pub fn build_list(&self) -> HttpRequest {
        self.rest.get("/api/payroll")
    }

    pub fn build_list_by_employee(&self, employee_id: i64) -> HttpRequest {
        self.rest.get(&format!("/api/payroll/employee/{employee_id}"))
    }

    pub fn build_list_by_status(&self, status: PayrollStatus) -> HttpRequest {
        self.rest.get(&format!("/api/payroll/status/{status}"))
    }

    pub fn build_create(&self, input: &NewSalary) -> Result<HttpRequest, ApiError> {
        self.rest.post("/api/payroll", input)
    }

    /// Any target status is accepted here; the service decides.
    pub fn build_update_status(&self, id: i64, status: PayrollStatus) -> HttpRequest {
        self.rest.put_empty(&format!("/api/payroll/{id}/status/{status}"))
    }

    /// Generate current-month drafts for every employee.
    pub fn build_bulk_generate(&self) -> HttpRequest {
        self.rest.post_empty("/api/payroll/bulk")
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<Salary>, ApiError> {
        decode_json(response, &[200])
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Salary, ApiError> {
        decode_json(response, &[200, 201])
    }

    pub fn parse_update_status(&self, response: HttpResponse) -> Result<Salary, ApiError> {
        decode_json(response, &[200])
    }

    pub fn parse_bulk_generate(&self, response: HttpResponse) -> Result<String, ApiError> {
        decode_text(response, &[200])
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::http::HttpMethod;

    fn client() -> PayrollClient {
        PayrollClient::new("http://localhost:8082")
    }

    #[test]
    fn build_update_status_has_no_body() {
        let req = client().build_update_status(5, PayrollStatus::Approved);
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:8082/api/payroll/5/status/APPROVED");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_update_status_does_not_filter_transitions() {
        let req = client().build_update_status(5, PayrollStatus::Draft);
        assert_eq!(req.path, "http://localhost:8082/api/payroll/5/status/DRAFT");
    }

    #[test]
    fn build_bulk_generate_is_empty_post() {
        let req = client().build_bulk_generate();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8082/api/payroll/bulk");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_listing_paths() {
        assert_eq!(client().build_list().path, "http://localhost:8082/api/payroll");
        assert_eq!(
            client().build_list_by_employee(3).path,
            "http://localhost:8082/api/payroll/employee/3"
        );
        assert_eq!(
            client().build_list_by_status(PayrollStatus::Paid).path,
            "http://localhost:8082/api/payroll/status/PAID"
        );
    }

    #[test]
    fn build_create_sends_precomputed_net() {
        let input = NewSalary {
            employee_id: 1,
            employee_code: "E1".to_string(),
            basic_salary: 3000.0,
            allowances: 250.0,
            deductions: 100.0,
            net_salary: 3150.0,
            pay_period: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            status: PayrollStatus::Draft,
        };
        let req = client().build_create(&input).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["netSalary"], 3150.0);
        assert_eq!(body["payPeriod"], "2024-05-01");
    }

    #[test]
    fn parse_create_bad_request_keeps_body() {
        let err = client()
            .parse_create(HttpResponse::new(400, r#"{"message":"Employee code is required"}"#))
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.server_message().as_deref(), Some("Employee code is required"));
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client().parse_list(HttpResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
