//! Login endpoint shared by both services.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::rest::{decode_json, RestClient};
use crate::types::{LoginRequest, LoginResponse};

/// Which backend a login attempt targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginProvider {
    EmployeeService,
    PayrollService,
}

impl LoginProvider {
    pub fn name(&self) -> &'static str {
        match self {
            LoginProvider::EmployeeService => "employee-service",
            LoginProvider::PayrollService => "payroll-service",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    rest: RestClient,
}

impl AuthClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            rest: RestClient::new(base_url),
        }
    }

    pub fn build_login(&self, credentials: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.rest.post("/api/auth/login", credentials)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        decode_json(response, &[200])
    }
}
