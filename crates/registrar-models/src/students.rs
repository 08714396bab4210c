//! Student domain models and DTOs.
//!
//! A student record doubles as the account that owns it: registering creates
//! a record and the issued token is bound to that record's id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A student in the system.
///
/// The password hash is stored alongside the row but is never part of this
/// struct, so it cannot leak through a response.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub course: String,
    pub grade: String,
    pub created_by: String,
    pub created_on: DateTime<Utc>,
    pub updated_by: String,
    pub updated_on: DateTime<Utc>,
}

/// DTO for registering or creating a student.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "course must be at most 100 characters"))]
    pub course: String,
    #[serde(default)]
    #[validate(length(max = 10, message = "grade must be at most 10 characters"))]
    pub grade: String,
}

/// DTO for updating an existing student.
///
/// All fields are optional; only provided fields are changed.
#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    #[validate(length(max = 100, message = "course must be at most 100 characters"))]
    pub course: Option<String>,
    #[validate(length(max = 10, message = "grade must be at most 10 characters"))]
    pub grade: Option<String>,
}

/// Store input for a new row. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub password_hash: String,
    pub course: String,
    pub grade: String,
    pub created_by: String,
}

/// Store input for a partial update. The password, if any, is already hashed.
#[derive(Debug, Clone)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub course: Option<String>,
    pub grade: Option<String>,
    pub updated_by: String,
}
