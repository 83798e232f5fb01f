use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use pawkeep_core::AppConfig;

use crate::auth::TokenSigner;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Authenticated user id resolved from the bearer token, stored as a request
/// extension on protected routes.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

/// Token verification settings shared by the auth middleware and the
/// signup/login handlers.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub signer: TokenSigner,
    pub password_salt: String,
    pub token_ttl_secs: u64,
}

impl AuthState {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            signer: TokenSigner::new(&config.auth_token_secret),
            password_salt: config.password_hash_salt.clone(),
            token_ttl_secs: config.token_ttl_secs,
        }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for MiddlewareErrorBody {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware that verifies the bearer token and injects [`CurrentUser`].
pub async fn require_auth(State(auth): State<AuthState>, mut req: Request, next: Next) -> Response {
    let user_id = extract_bearer_token(req.headers().get(AUTHORIZATION))
        .and_then(|token| auth.signer.verify(token));

    match user_id {
        Some(user_id) => {
            req.extensions_mut().insert(CurrentUser(user_id));
            next.run(req).await
        }
        None => MiddlewareErrorBody {
            error: MiddlewareError {
                code: "unauthorized",
                message: "missing, invalid, or expired bearer token",
            },
        }
        .into_response(),
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_bearer_token_accepts_valid_header() {
        let header = HeaderValue::from_static("Bearer test-token");
        assert_eq!(extract_bearer_token(Some(&header)), Some("test-token"));
    }

    #[test]
    fn extract_bearer_token_rejects_non_bearer_header() {
        let header = HeaderValue::from_static("Basic abc123");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[test]
    fn extract_bearer_token_rejects_empty_token() {
        let header = HeaderValue::from_static("Bearer ");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }
}
