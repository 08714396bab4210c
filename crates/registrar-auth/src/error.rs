//! Authentication and authorization failures.
//!
//! These are ordinary decisions, not faults: each maps to a fixed status and a
//! fixed public message. The variant itself is only ever logged, so a caller
//! cannot tell a bad signature from an expired token.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No signing secret configured; tokens can be neither issued nor verified.
    #[error("token signing secret is not configured")]
    Configuration,
    /// Bad signature, non-HMAC algorithm, malformed structure or expired.
    #[error("invalid token")]
    InvalidToken,
    /// No usable credential on the request.
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("resource identifier not provided in the request")]
    MissingResourceId,
    #[error("invalid resource identifier format")]
    BadResourceId,
    #[error("identity may not act on this resource")]
    Forbidden,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InvalidToken | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::MissingResourceId | AuthError::BadResourceId => StatusCode::BAD_REQUEST,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// Message safe to send to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::Configuration => "Internal Server Error",
            AuthError::InvalidToken | AuthError::Unauthenticated => "Unauthorized",
            AuthError::MissingResourceId => "Resource ID not provided in the request",
            AuthError::BadResourceId => "Invalid resource ID format",
            AuthError::Forbidden => "Forbidden",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}
