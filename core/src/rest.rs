//! Generic REST request builder shared by the domain clients.
//!
//! `RestClient` joins paths onto a base URL and encodes JSON bodies. It
//! never performs I/O; response helpers at the bottom map statuses and
//! bodies into `ApiError`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const CONTENT_TYPE_JSON: (&str, &str) = ("content-type", "application/json");

#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get(&self, path: &str) -> HttpRequest {
        self.bare(HttpMethod::Get, path)
    }

    pub fn delete(&self, path: &str) -> HttpRequest {
        self.bare(HttpMethod::Delete, path)
    }

    pub fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<HttpRequest, ApiError> {
        self.exchange(HttpMethod::Post, path, Some(body), &[])
    }

    pub fn post_empty(&self, path: &str) -> HttpRequest {
        self.bare(HttpMethod::Post, path)
    }

    pub fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<HttpRequest, ApiError> {
        self.exchange(HttpMethod::Put, path, Some(body), &[])
    }

    pub fn put_empty(&self, path: &str) -> HttpRequest {
        self.bare(HttpMethod::Put, path)
    }

    pub fn patch<T: Serialize>(&self, path: &str, body: &T) -> Result<HttpRequest, ApiError> {
        self.exchange(HttpMethod::Patch, path, Some(body), &[])
    }

    /// Build a request for any method. A body is JSON-encoded and tagged
    /// with a content type; `headers` are appended after it.
    pub fn exchange<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&T>,
        headers: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let mut request = self.bare(method, path);
        if let Some(body) = body {
            let encoded =
                serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
            request
                .headers
                .push((CONTENT_TYPE_JSON.0.to_string(), CONTENT_TYPE_JSON.1.to_string()));
            request.body = Some(encoded);
        }
        request
            .headers
            .extend(headers.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        Ok(request)
    }

    fn bare(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }
}

/// Attach `authorization: Bearer <token>` when a token is present.
pub fn with_bearer(mut request: HttpRequest, token: Option<&str>) -> HttpRequest {
    if let Some(token) = token {
        request
            .headers
            .push(("authorization".to_string(), format!("Bearer {token}")));
    }
    request
}

/// Map a response outside `accepted` to the matching `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse, accepted: &[u16]) -> Result<(), ApiError> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    match response.status {
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::Http {
            status,
            body: response.body.clone(),
        }),
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(
    response: HttpResponse,
    accepted: &[u16],
) -> Result<T, ApiError> {
    check_status(&response, accepted)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Plain-text bodies are returned verbatim; a JSON string literal is unquoted.
pub(crate) fn decode_text(response: HttpResponse, accepted: &[u16]) -> Result<String, ApiError> {
    check_status(&response, accepted)?;
    let body = response.body;
    if body.trim_start().starts_with('"') {
        if let Ok(text) = serde_json::from_str::<String>(&body) {
            return Ok(text);
        }
    }
    Ok(body)
}
