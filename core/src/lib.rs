//! Synchronous client core for the employee and payroll admin console.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network. The host supplies a `Transport` that performs the
//! round-trip, so every screen and client here is deterministic under test.
//!
//! # Design
//! - `EmployeeClient`, `PayrollClient` and `AuthClient` are stateless and
//!   hold only their base URL. Each operation is split into `build_*` and
//!   `parse_*`, so the I/O boundary is explicit.
//! - `Api` pairs the clients with a transport and the bearer token.
//! - `SessionManager` owns the logged-in user and runs the two-backend
//!   login fallback.
//! - `views` holds per-screen state machines driven by the host UI.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod auth;
pub mod config;
pub mod employee;
pub mod error;
pub mod format;
pub mod http;
pub mod payroll;
pub mod rest;
pub mod session;
pub mod storage;
pub mod types;
pub mod views;

#[cfg(test)]
mod testing;

pub use api::Api;
pub use auth::{AuthClient, LoginProvider};
pub use config::AppConfig;
pub use employee::EmployeeClient;
pub use error::{ApiError, ConfigError, LoginError, StorageError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use payroll::PayrollClient;
pub use session::{AuthState, SessionManager};
pub use storage::{MemoryStorage, Storage};
pub use types::{
    Employee, LoginRequest, LoginResponse, NewEmployee, NewSalary, PayrollStatus, Role, Salary,
    Session,
};
