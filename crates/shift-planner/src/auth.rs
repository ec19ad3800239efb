//! Bearer-token authentication seam.
//!
//! Token issuance, password hashing, and session expiry live outside this
//! crate; routers only need `verify` and the role carried back.

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Role attached to a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRole {
    Driver,
    Admin,
}

impl AccessRole {
    pub const fn label(self) -> &'static str {
        match self {
            AccessRole::Driver => "driver",
            AccessRole::Admin => "admin",
        }
    }
}

/// Identity resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: u64,
    pub role: AccessRole,
}

/// External verifier for bearer tokens.
pub trait AuthProvider: Send + Sync {
    fn verify(&self, token: &str) -> Option<AuthContext>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("admin role required")]
    AdminRequired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::AdminRequired => StatusCode::FORBIDDEN,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer "))?;
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Resolve the caller's identity or fail with the matching 401.
pub fn authenticate<P: AuthProvider>(
    provider: &P,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    provider.verify(token).ok_or(AuthError::InvalidToken)
}

/// As [`authenticate`], additionally requiring the admin role.
pub fn authenticate_admin<P: AuthProvider>(
    provider: &P,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let context = authenticate(provider, headers)?;
    if context.role == AccessRole::Admin {
        Ok(context)
    } else {
        Err(AuthError::AdminRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    struct SingleToken;

    impl AuthProvider for SingleToken {
        fn verify(&self, token: &str) -> Option<AuthContext> {
            (token == "valid").then_some(AuthContext {
                user_id: 7,
                role: AccessRole::Driver,
            })
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).expect("ascii"));
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn authenticate_rejects_unknown_tokens() {
        let err = authenticate(&SingleToken, &headers_with("Bearer nope"))
            .expect_err("unknown token rejected");
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn admin_gate_rejects_driver_tokens() {
        let err = authenticate_admin(&SingleToken, &headers_with("Bearer valid"))
            .expect_err("driver is not admin");
        assert!(matches!(err, AuthError::AdminRequired));
    }
}
