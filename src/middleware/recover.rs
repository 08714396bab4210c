use std::any::Any;

use async_trait::async_trait;
use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{Instrument, error};

use super::Stage;

/// Aborts the task when dropped, so a request abandoned by its client does
/// not keep running detached.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Runs the rest of the chain in its own task so a panic downstream is
/// contained to the request that caused it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoverStage;

#[async_trait]
impl Stage for RecoverStage {
    fn name(&self) -> &'static str {
        "recover"
    }

    async fn handle(&self, req: Request, next: Next) -> Response {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let mut task = AbortOnDrop(tokio::spawn(next.run(req).in_current_span()));

        match (&mut task.0).await {
            Ok(response) => response,
            Err(err) if err.is_panic() => {
                let payload = err.into_panic();
                error!(%method, %path, panic = panic_message(payload.as_ref()), "Recovered from panic");
                internal_error()
            }
            Err(err) => {
                error!(%method, %path, error = %err, "Request task cancelled");
                internal_error()
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal Server Error" })),
    )
        .into_response()
}
