//! # Registrar Core
//!
//! Core types and utilities shared by the Registrar API crates:
//!
//! - [`errors`]: [`AppError`], the HTTP-aware error returned by handlers
//! - [`password`]: bcrypt password hashing

pub mod errors;
pub mod password;

pub use errors::AppError;
pub use password::hash_password;
