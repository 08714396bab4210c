//! # Registrar Config
//!
//! Configuration structures loaded once at startup from environment variables:
//!
//! - [`jwt`]: token signing secret, admin bypass token and token lifetime
//! - [`cors`]: allowed cross-origin callers
//! - [`server`]: request deadline
//!
//! Every config exposes `from_env()` plus a `from_lookup()` that takes the
//! variable source as a closure, so parsing can be exercised without touching
//! the process environment.
//!
//! # Example
//!
//! ```ignore
//! use registrar_config::{CorsConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Reads a variable and drops it when blank.
pub(crate) fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
