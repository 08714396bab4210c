use axum::{Json, extract::State};
use tracing::{error, info, instrument};

use registrar_auth::AuthError;
use registrar_core::AppError;
use registrar_models::{CreateStudentDto, ErrorResponse, TokenResponse};

use crate::middleware::Deadline;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a student and receive a token bound to the new record
#[utoipa::path(
    post,
    path = "/register",
    request_body = CreateStudentDto,
    responses(
        (status = 200, description = "Student registered", body = TokenResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    deadline: Deadline,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<Json<TokenResponse>, AppError> {
    // No record is written if a token could not be issued for it.
    if !state.codec.can_sign() {
        error!("Registration refused: token signing secret is not configured");
        return Err(AppError::internal(AuthError::Configuration));
    }

    let student = deadline
        .try_run(StudentService::create_student(
            state.store.as_ref(),
            dto,
            "user",
        ))
        .await?;

    let token = state.codec.issue(student.id, &student.name).map_err(|err| {
        error!(student_id = student.id, error = %err, "Token issuance failed");
        AppError::internal(err)
    })?;

    info!(student_id = student.id, "Student registered");
    Ok(Json(TokenResponse { token }))
}
