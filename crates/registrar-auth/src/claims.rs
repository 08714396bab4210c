use serde::{Deserialize, Serialize};

/// Payload of an identity token.
///
/// `name` is informational only and never consulted for access decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identifier of the student record the token owns
    pub user_id: i32,
    /// Display name captured at registration
    pub name: String,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expires-at (Unix timestamp, seconds)
    pub exp: i64,
}
