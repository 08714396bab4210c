//! Self-service ownership check.
//!
//! Admins act on every record. Users may read anything but may only write the
//! record whose identifier equals their own subject id. The decision is
//! recomputed for every request; nothing is cached.

use axum::http::Method;

use crate::error::AuthError;
use crate::identity::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    MissingResourceId,
    BadResourceId,
    Forbidden,
}

impl Decision {
    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(denial) => Err(denial.into()),
        }
    }
}

impl From<Denial> for AuthError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::MissingResourceId => AuthError::MissingResourceId,
            Denial::BadResourceId => AuthError::BadResourceId,
            Denial::Forbidden => AuthError::Forbidden,
        }
    }
}

fn is_read(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

/// Decides whether `identity` may perform `method` on the record named by
/// `resource_id` (the raw path or query value, if any).
pub fn authorize(identity: &Identity, method: &Method, resource_id: Option<&str>) -> Decision {
    match identity {
        Identity::Admin => Decision::Allow,
        Identity::User { .. } if is_read(method) => Decision::Allow,
        Identity::User { subject_id } => {
            let Some(raw) = resource_id.map(str::trim).filter(|raw| !raw.is_empty()) else {
                return Decision::Deny(Denial::MissingResourceId);
            };

            match raw.parse::<i32>() {
                Ok(requested) if requested == *subject_id => Decision::Allow,
                Ok(_) => Decision::Deny(Denial::Forbidden),
                Err(_) => Decision::Deny(Denial::BadResourceId),
            }
        }
    }
}
