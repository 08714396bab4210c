//! Credential to identity resolution.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use registrar_config::JwtConfig;

use crate::error::AuthError;
use crate::jwt::TokenCodec;

/// The subject a request acts as. Created once per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    /// Holder of the static admin bypass token; may act on every record.
    Admin,
    /// Holder of a signed token bound to exactly one student record.
    User { subject_id: i32 },
}

impl Identity {
    pub fn subject_id(&self) -> Option<i32> {
        match self {
            Identity::Admin => None,
            Identity::User { subject_id } => Some(*subject_id),
        }
    }

    /// Audit label stored in `created_by` / `updated_by`.
    pub fn label(&self) -> &'static str {
        match self {
            Identity::Admin => "admin",
            Identity::User { .. } => "user",
        }
    }
}

pub struct IdentityResolver {
    admin_token: Option<String>,
    codec: Arc<TokenCodec>,
}

impl IdentityResolver {
    pub fn new(config: &JwtConfig, codec: Arc<TokenCodec>) -> Self {
        Self {
            admin_token: config.admin_token.clone().filter(|token| !token.is_empty()),
            codec,
        }
    }

    pub fn resolve(&self, credential: &str) -> Result<Identity, AuthError> {
        self.resolve_at(credential, Utc::now())
    }

    /// Resolves `credential` as the admin bypass token first, then as a signed
    /// token checked against `now`.
    pub fn resolve_at(&self, credential: &str, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        if credential.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        if let Some(admin_token) = self.admin_token.as_deref() {
            if credential == admin_token {
                debug!("Admin token matched");
                return Ok(Identity::Admin);
            }
        }

        match self.codec.verify_at(credential, now) {
            Ok(claims) => {
                debug!(user_id = claims.user_id, "User token authenticated");
                Ok(Identity::User {
                    subject_id: claims.user_id,
                })
            }
            Err(reason) => {
                debug!(%reason, "Credential did not resolve to an identity");
                Err(AuthError::Unauthenticated)
            }
        }
    }
}

impl fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("admin_bypass", &self.admin_token.is_some())
            .field("codec", &self.codec)
            .finish()
    }
}
