//! Service endpoints and request timeout, sourced from the environment.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_EMPLOYEE_SERVICE_URL: &str = "http://localhost:8081";
pub const DEFAULT_PAYROLL_SERVICE_URL: &str = "http://localhost:8082";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub employee_service_url: String,
    pub payroll_service_url: String,
    /// Handed to the host transport; the core itself never enforces it.
    pub api_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            employee_service_url: DEFAULT_EMPLOYEE_SERVICE_URL.to_string(),
            payroll_service_url: DEFAULT_PAYROLL_SERVICE_URL.to_string(),
            api_timeout: Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
        }
    }
}

impl AppConfig {
    /// Load from process environment, after merging a `.env` file if one
    /// exists in the working directory or its parents.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values fall back to
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_timeout = match var("API_TIMEOUT_MS") {
            Some(raw) => {
                let millis = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidTimeout {
                    name: "API_TIMEOUT_MS",
                    value: raw.clone(),
                })?;
                Duration::from_millis(millis)
            }
            None => Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
        };

        Ok(Self {
            employee_service_url: var("EMPLOYEE_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_EMPLOYEE_SERVICE_URL.to_string()),
            payroll_service_url: var("PAYROLL_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_PAYROLL_SERVICE_URL.to_string()),
            api_timeout,
        })
    }
}
