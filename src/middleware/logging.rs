use async_trait::async_trait;
use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::Stage;

/// Logs every request on the way in and its outcome on the way out.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingStage;

#[async_trait]
impl Stage for LoggingStage {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn handle(&self, req: Request, next: Next) -> Response {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req
            .extensions()
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| req.uri().path().to_string());
        let request_id = uuid::Uuid::new_v4();

        info!(%request_id, %method, %path, "Incoming request");

        let response = next.run(req).await;
        let status = response.status().as_u16();
        let latency_ms = start.elapsed().as_millis();

        match status {
            400..=499 => warn!(%request_id, %method, %path, status, %latency_ms, "Client error"),
            500..=599 => error!(%request_id, %method, %path, status, %latency_ms, "Server error"),
            _ => info!(%request_id, %method, %path, status, %latency_ms, "Request completed"),
        }

        response
    }
}
