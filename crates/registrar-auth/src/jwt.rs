//! Identity token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying [`Claims`]. Verification accepts any
//! algorithm of the HMAC family and nothing else: a header announcing RS256,
//! ES256 or `none` is rejected before the signature is looked at, which closes
//! the classic algorithm-confusion forgery.
//!
//! Expiry is checked against an explicit clock (`verify_at`) with zero leeway.
//! A token is valid strictly before `exp`.
//!
//! # Example
//!
//! ```ignore
//! let codec = TokenCodec::new(&JwtConfig::from_env());
//! let token = codec.issue(7, "Ada")?;
//! let claims = codec.verify(&token)?;
//! assert_eq!(claims.user_id, 7);
//! ```

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{debug, error};

use registrar_config::JwtConfig;

use crate::claims::Claims;
use crate::error::AuthError;

const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies identity tokens with the process-wide signing secret.
///
/// Built once at startup and shared read-only across requests.
pub struct TokenCodec {
    keys: Option<SigningKeys>,
    ttl: Duration,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        let keys = config.secret.as_deref().map(|secret| SigningKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // exp is compared in verify_at against the caller's clock
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys,
            // out-of-range lifetimes saturate; issue_at then refuses them
            ttl: Duration::try_seconds(config.token_ttl_secs).unwrap_or(Duration::MAX),
            validation,
        }
    }

    /// Whether a signing secret is configured.
    pub fn can_sign(&self) -> bool {
        self.keys.is_some()
    }

    pub fn issue(&self, subject_id: i32, name: &str) -> Result<String, AuthError> {
        self.issue_at(subject_id, name, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject_id: i32,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let Some(keys) = self.keys.as_ref() else {
            error!("JWT_SECRET is not configured; refusing to issue a token");
            return Err(AuthError::Configuration);
        };

        let Some(expires_at) = now.checked_add_signed(self.ttl) else {
            error!(
                ttl_secs = self.ttl.num_seconds(),
                "Token lifetime overflows the clock; refusing to issue"
            );
            return Err(AuthError::Configuration);
        };

        let claims = Claims {
            user_id: subject_id,
            name: name.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).map_err(|e| {
            error!(error = %e, "Failed to sign token");
            AuthError::Configuration
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let Some(keys) = self.keys.as_ref() else {
            error!("JWT_SECRET is not configured; cannot verify tokens");
            return Err(AuthError::InvalidToken);
        };

        let claims = decode::<Claims>(token, &keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })?;

        if now.timestamp() >= claims.exp {
            debug!(user_id = claims.user_id, exp = claims.exp, "Token expired");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("configured", &self.keys.is_some())
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}
