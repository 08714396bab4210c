//! # Registrar Auth
//!
//! Everything that decides whether a request may proceed:
//!
//! - [`jwt`]: the [`TokenCodec`] that issues and verifies signed identity tokens
//! - [`identity`]: the [`IdentityResolver`] turning a raw credential into an [`Identity`]
//! - [`gate`]: [`authorize`], the stateless ownership check
//! - [`error`]: [`AuthError`] and its fixed HTTP status mapping
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use registrar_auth::{IdentityResolver, TokenCodec, authorize};
//! use registrar_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let codec = Arc::new(TokenCodec::new(&config));
//! let resolver = IdentityResolver::new(&config, codec.clone());
//!
//! let token = codec.issue(7, "Ada")?;
//! let identity = resolver.resolve(&token)?;
//! let decision = authorize(&identity, &Method::DELETE, Some("7"));
//! ```

pub mod claims;
pub mod error;
pub mod gate;
pub mod identity;
pub mod jwt;

pub use claims::Claims;
pub use error::AuthError;
pub use gate::{Decision, Denial, authorize};
pub use identity::{Identity, IdentityResolver};
pub use jwt::TokenCodec;
