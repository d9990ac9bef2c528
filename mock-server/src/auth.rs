use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{Backend, Failure};

/// Accounts the employee service accepts.
pub const EMPLOYEE_ACCOUNTS: &[(&str, &str)] = &[("admin", "admin123")];

/// Accounts the payroll service accepts.
pub const PAYROLL_ACCOUNTS: &[(&str, &str)] = &[("hr", "hr123"), ("admin", "admin123")];

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Check `credentials` against `accounts` and mint a token valid on both
/// services.
pub async fn login(
    backend: &Backend,
    accounts: &[(&str, &str)],
    credentials: Credentials,
) -> Result<Json<TokenResponse>, Failure> {
    let known = accounts
        .iter()
        .any(|(user, pass)| *user == credentials.username && *pass == credentials.password);
    if !known {
        debug!(username = %credentials.username, "login rejected");
        return Err(Failure::Unauthorized);
    }

    let token = Uuid::new_v4().to_string();
    backend.write().await.tokens.insert(token.clone());
    info!(username = %credentials.username, "token issued");
    Ok(Json(TokenResponse { token }))
}

/// Route layer: 401 unless the request carries a bearer token we issued.
pub async fn require_bearer(
    State(backend): State<Backend>,
    req: Request,
    next: Next,
) -> Result<Response, Failure> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(Failure::Unauthorized)?;

    if !backend.read().await.has_token(token) {
        return Err(Failure::Unauthorized);
    }
    Ok(next.run(req).await)
}
