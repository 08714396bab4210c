//! # Registrar Models
//!
//! Domain models and DTOs shared by the API and the store:
//!
//! - [`students`]: the student record, its request DTOs and store inputs
//! - [`auth`]: registration and error bodies
//! - [`health`]: health check bodies

pub mod auth;
pub mod health;
pub mod students;

pub use auth::{ErrorResponse, TokenResponse};
pub use health::HealthResponse;
pub use students::{CreateStudentDto, NewStudent, Student, StudentChanges, UpdateStudentDto};
