//! Token signing configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC signing secret. Required to issue or verify tokens.
//! - `JWT_ADMIN_TOKEN`: static bypass credential granting the admin identity.
//!   Optional; when unset the admin bypass is unreachable.
//! - `JWT_TTL_HOURS`: token lifetime in hours (default: 72, at most ten years)
//!
//! Blank values count as unset. Neither secret ever appears in `Debug` output.

use std::env;
use std::fmt;

/// Default token lifetime: 72 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 72 * 60 * 60;

/// Longest accepted `JWT_TTL_HOURS`; larger values fall back to the default.
pub const MAX_TOKEN_TTL_HOURS: i64 = 10 * 365 * 24;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub admin_token: Option<String>,
    pub token_ttl_secs: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            secret: crate::non_empty(&lookup, "JWT_SECRET"),
            admin_token: crate::non_empty(&lookup, "JWT_ADMIN_TOKEN"),
            token_ttl_secs: crate::non_empty(&lookup, "JWT_TTL_HOURS")
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|hours| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
                .and_then(|hours| hours.checked_mul(60 * 60))
                .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
        }
    }

    /// Config with a signing secret and the default lifetime.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            admin_token: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    pub fn admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}
