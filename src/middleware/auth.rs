//! Authentication and ownership check for the protected route group.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query, RawPathParams, Request},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use registrar_auth::{AuthError, Identity, IdentityResolver, authorize};

use super::Stage;

/// Optional scheme word in front of the credential. Matched case-sensitively.
pub const TOKEN_SCHEME: &str = "Token";

/// Name of the path or query parameter that identifies the target record.
pub const RESOURCE_ID_PARAM: &str = "id";

/// Pulls the credential out of an `Authorization` value: surrounding
/// whitespace and a leading `Token` scheme are removed. The scheme only counts
/// as one when whitespace or the end of the value follows it.
pub fn credential_from_header(value: &str) -> &str {
    let value = value.trim();
    match value.strip_prefix(TOKEN_SCHEME) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            rest.trim()
        }
        _ => value,
    }
}

fn credential(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(credential_from_header)
}

#[derive(Debug, Deserialize)]
struct ResourceQuery {
    id: Option<String>,
}

/// The path parameter wins over the query parameter.
async fn resource_id(parts: &mut Parts) -> Option<String> {
    let from_path = RawPathParams::from_request_parts(parts, &())
        .await
        .ok()
        .and_then(|params| {
            params
                .iter()
                .find(|(key, _)| *key == RESOURCE_ID_PARAM)
                .map(|(_, value)| value.to_string())
        });

    from_path.or_else(|| {
        Query::<ResourceQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.id)
    })
}

#[derive(Clone)]
pub struct AuthStage {
    resolver: Arc<IdentityResolver>,
}

impl AuthStage {
    pub fn new(resolver: Arc<IdentityResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Stage for AuthStage {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn handle(&self, req: Request, next: Next) -> Response {
        let (mut parts, body) = req.into_parts();

        let identity = match credential(&parts.headers)
            .ok_or(AuthError::Unauthenticated)
            .and_then(|credential| self.resolver.resolve(credential))
        {
            Ok(identity) => identity,
            Err(err) => {
                warn!(method = %parts.method, path = %parts.uri.path(), reason = %err, "Authentication failed");
                return err.into_response();
            }
        };

        let resource_id = resource_id(&mut parts).await;
        if let Err(err) = authorize(&identity, &parts.method, resource_id.as_deref()).into_result() {
            warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                identity = identity.label(),
                resource_id = resource_id.as_deref().unwrap_or(""),
                reason = %err,
                "Authorization denied"
            );
            return err.into_response();
        }

        parts.extensions.insert(identity);
        next.run(Request::from_parts(parts, body)).await
    }
}

/// The identity [`AuthStage`] attached to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    /// Audit label recorded in `created_by` / `updated_by`.
    pub fn label(&self) -> &'static str {
        self.0.label()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(AuthUser)
            .ok_or(AuthError::Unauthenticated)
    }
}
