//! Request builder and response parser for the employee service.
//!
//! Follows the build/parse split: every operation has a `build_*` method
//! producing an `HttpRequest` and a `parse_*` method consuming the
//! `HttpResponse`. The client holds only its base URL.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::rest::{check_status, decode_json, decode_text, RestClient};
use crate::types::{Employee, NewEmployee};

#[derive(Debug, Clone)]
pub struct EmployeeClient {
    rest: RestClient,
}

impl EmployeeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            rest: RestClient::new(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.rest.base_url()
    }

    pub fn build_list(&self) -> HttpRequest {
        self.rest.get("/api/employees")
    }

    pub fn build_get(&self, id: i64) -> HttpRequest {
        self.rest.get(&format!("/api/employees/{id}"))
    }

    pub fn build_get_by_code(&self, code: &str) -> HttpRequest {
        self.rest.get(&format!("/api/employees/code/{code}"))
    }

    pub fn build_list_by_department(&self, department: &str) -> HttpRequest {
        self.rest.get(&format!("/api/employees/department/{department}"))
    }

    pub fn build_create(&self, input: &NewEmployee) -> Result<HttpRequest, ApiError> {
        self.rest.post("/api/employees", input)
    }

    pub fn build_delete(&self, id: i64) -> HttpRequest {
        self.rest.delete(&format!("/api/employees/{id}"))
    }

    /// Delete the employee and every salary record keyed by its code.
    pub fn build_cascade_delete(&self, code: &str) -> HttpRequest {
        self.rest.delete(&format!("/api/employees/cascade/{code}"))
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<Employee>, ApiError> {
        decode_json(response, &[200])
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<Employee, ApiError> {
        decode_json(response, &[200])
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Employee, ApiError> {
        decode_json(response, &[200, 201])
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }

    /// Returns the service's confirmation text.
    pub fn parse_cascade_delete(&self, response: HttpResponse) -> Result<String, ApiError> {
        decode_text(response, &[200])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn client() -> EmployeeClient {
        EmployeeClient::new("http://localhost:8081")
    }

    fn new_employee() -> NewEmployee {
        NewEmployee {
            employee_code: "EMP001".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            department: "Engineering".to_string(),
            position: "Analyst".to_string(),
            basic_salary: 5200.5,
            join_date: "2024-02-01".to_string(),
        }
    }

    #[test]
    fn build_list_produces_correct_request() {
        let req = client().build_list();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8081/api/employees");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_lookups_use_id_and_code_paths() {
        assert_eq!(client().build_get(42).path, "http://localhost:8081/api/employees/42");
        assert_eq!(
            client().build_get_by_code("EMP001").path,
            "http://localhost:8081/api/employees/code/EMP001"
        );
        assert_eq!(
            client().build_list_by_department("IT").path,
            "http://localhost:8081/api/employees/department/IT"
        );
    }

    #[test]
    fn build_create_sends_camel_case_body() {
        let req = client().build_create(&new_employee()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["employeeCode"], "EMP001");
        assert_eq!(body["basicSalary"], 5200.5);
        assert_eq!(body["joinDate"], "2024-02-01");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_cascade_delete_keys_by_code() {
        let req = client().build_cascade_delete("EMP001");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:8081/api/employees/cascade/EMP001");
    }

    #[test]
    fn parse_get_not_found() {
        let err = client().parse_get(HttpResponse::new(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_list_success() {
        let body = r#"[{"id":1,"employeeCode":"E1","firstName":"A","lastName":"B","email":"a@b.c","department":"IT","position":"Dev","basicSalary":100.0,"joinDate":"2024-01-15"}]"#;
        let employees = client().parse_list(HttpResponse::new(200, body)).unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].employee_code, "E1");
        assert_eq!(employees[0].basic_salary, Some(100.0));
    }

    #[test]
    fn parse_create_accepts_ok_and_created() {
        let body = r#"{"id":9,"employeeCode":"E9"}"#;
        assert!(client().parse_create(HttpResponse::new(200, body)).is_ok());
        assert!(client().parse_create(HttpResponse::new(201, body)).is_ok());
    }

    #[test]
    fn parse_delete_accepts_no_content() {
        assert!(client().parse_delete(HttpResponse::new(204, "")).is_ok());
    }

    #[test]
    fn parse_cascade_delete_returns_message() {
        let msg = client()
            .parse_cascade_delete(HttpResponse::new(200, "Employee and related salaries deleted successfully."))
            .unwrap();
        assert!(msg.starts_with("Employee and related salaries"));
    }

    #[test]
    fn parse_list_unauthorized() {
        let err = client().parse_list(HttpResponse::new(401, "")).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
