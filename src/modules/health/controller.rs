use axum::{Json, extract::State, http::StatusCode};
use tracing::warn;

use registrar_models::HealthResponse;

use crate::middleware::Deadline;
use crate::modules::students::service::StudentService;
use crate::state::AppState;

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Process is up", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::new("ok"))
}

/// Readiness check; verifies that the student store answers
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn ready(
    State(state): State<AppState>,
    deadline: Deadline,
) -> (StatusCode, Json<HealthResponse>) {
    match deadline.try_run(StudentService::ping(state.store.as_ref())).await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::new("ready"))),
        Err(err) => {
            warn!(error = %err.error, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::new("unavailable")),
            )
        }
    }
}
