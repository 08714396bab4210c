use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use registrar_core::AppError;
use registrar_models::{CreateStudentDto, ErrorResponse, Student, UpdateStudentDto};

use crate::middleware::{AuthUser, Deadline};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request(anyhow!("Invalid student ID format")))
}

#[utoipa::path(
    get,
    path = "/students",
    responses(
        (status = 200, description = "All students", body = Vec<Student>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 504, description = "Request deadline exceeded", body = ErrorResponse)
    ),
    security(("token_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
    deadline: Deadline,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = deadline
        .try_run(StudentService::get_students(state.store.as_ref()))
        .await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 400, description = "Invalid student ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 504, description = "Request deadline exceeded", body = ErrorResponse)
    ),
    security(("token_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    deadline: Deadline,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let id = parse_id(&id)?;
    let student = deadline
        .try_run(StudentService::get_student(state.store.as_ref(), id))
        .await?;
    Ok(Json(student))
}

/// Only admins, or a user naming their own id in `?id=`, get past the
/// ownership check for this route.
#[utoipa::path(
    post,
    path = "/students",
    request_body = CreateStudentDto,
    params(("id" = Option<i32>, Query, description = "Caller's own ID; required for non-admin callers")),
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Malformed body or missing ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("token_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    deadline: Deadline,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = deadline
        .try_run(StudentService::create_student(
            state.store.as_ref(),
            dto,
            auth_user.label(),
        ))
        .await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    put,
    path = "/students/{id}",
    request_body = UpdateStudentDto,
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Invalid student ID or body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("token_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    deadline: Deadline,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let id = parse_id(&id)?;
    let student = deadline
        .try_run(StudentService::update_student(
            state.store.as_ref(),
            id,
            dto,
            auth_user.label(),
        ))
        .await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 400, description = "Invalid student ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("token_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    deadline: Deadline,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    deadline
        .try_run(StudentService::delete_student(state.store.as_ref(), id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
