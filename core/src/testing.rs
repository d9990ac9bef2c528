//! In-memory transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::config::AppConfig;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

pub const EMPLOYEE_URL: &str = "http://employees.test";
pub const PAYROLL_URL: &str = "http://payroll.test";

/// Configuration pointing both services at the scripted hosts.
pub fn test_config() -> AppConfig {
    AppConfig {
        employee_service_url: EMPLOYEE_URL.to_string(),
        payroll_service_url: PAYROLL_URL.to_string(),
        ..AppConfig::default()
    }
}

type Reply = Result<HttpResponse, TransportError>;

/// Replies with canned responses keyed by method and absolute URL, and
/// records every request it sees. The last reply queued for a route is
/// repeated once the queue drains.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: HttpMethod, url: &str, status: u16, body: &str) -> Self {
        self.push(method, url, Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, method: HttpMethod, url: &str) -> Self {
        self.push(method, url, Err(TransportError("connection refused".to_string())));
        self
    }

    fn push(&self, method: HttpMethod, url: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(&(request.method, request.path.clone())) else {
            return Err(TransportError(format!(
                "no scripted reply for {} {}",
                request.method.as_str(),
                request.path
            )));
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}
