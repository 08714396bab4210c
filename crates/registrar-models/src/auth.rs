use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned by a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed identity token; present it as `Authorization: Token <value>`
    pub token: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
