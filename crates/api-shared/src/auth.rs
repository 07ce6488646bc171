//! API-key access gate.
//!
//! Thin adapter for the external access gate: every guarded route
//! requires a matching `x-api-key` header. Credential storage, token
//! issuance and role management stay outside this service; only the key
//! comparison happens here.

use crate::wire::ErrorRes;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The expected API key, resolved once at startup.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Middleware rejecting requests without a valid `x-api-key` header.
///
/// Returns `401 {"error": "Unauthorized"}` on a missing or mismatched
/// key; otherwise the request proceeds unchanged.
pub async fn require_api_key(
    State(expected): State<ApiKey>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if key == expected.as_str() => next.run(request).await,
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorRes {
                error: "Unauthorized".into(),
                step: None,
            }),
        )
            .into_response(),
    }
}
