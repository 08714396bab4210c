//! Per-request deadline.
//!
//! The stage only attaches a [`Deadline`] to the request; nothing is aborted
//! on its behalf. Handlers observe it by racing their work against it with
//! [`Deadline::run`] or by awaiting [`Deadline::expired`].

use std::convert::Infallible;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use thiserror::Error;
use tokio::time::{Instant, sleep_until};

use registrar_core::AppError;

use super::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request deadline exceeded")]
pub struct DeadlineExceeded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Option<Instant>,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + timeout),
        }
    }

    /// A deadline that never fires.
    pub fn never() -> Self {
        Self { expires_at: None }
    }

    /// Time left, or `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    /// Resolves once the deadline has passed.
    pub async fn expired(&self) {
        match self.expires_at {
            Some(at) => sleep_until(at).await,
            None => std::future::pending().await,
        }
    }

    /// Runs `fut` unless the deadline fires first, in which case `fut` is dropped.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            output = fut => Ok(output),
            _ = self.expired() => Err(DeadlineExceeded),
        }
    }

    /// [`Deadline::run`] for handler work; expiry becomes a 504.
    pub async fn try_run<F, T>(&self, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        self.run(fut).await.map_err(AppError::timeout)?
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::never()
    }
}

impl<S> FromRequestParts<S> for Deadline
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Deadline>().copied().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeadlineStage {
    timeout: Duration,
}

impl DeadlineStage {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Stage for DeadlineStage {
    fn name(&self) -> &'static str {
        "deadline"
    }

    async fn handle(&self, mut req: Request, next: Next) -> Response {
        req.extensions_mut().insert(Deadline::after(self.timeout));
        next.run(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_run_completes_before_deadline() {
        let deadline = Deadline::after(Duration::from_secs(5));
        let result = deadline
            .run(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                7
            })
            .await;
        assert_eq!(result, Ok(7));
        assert!(!deadline.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cancelled_at_deadline() {
        let deadline = Deadline::after(Duration::from_secs(5));
        let result = deadline
            .run(tokio::time::sleep(Duration::from_secs(60)))
            .await;
        assert_eq!(result, Err(DeadlineExceeded));
        assert!(deadline.is_expired());
        assert_eq!(deadline.remaining(), Some(Duration::ZERO));
    }

    #[tokio::test(start_paused = true)]
    async fn test_try_run_maps_expiry_to_gateway_timeout() {
        let deadline = Deadline::after(Duration::from_millis(10));
        let err = deadline
            .try_run(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, AppError>(())
            })
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_does_not_fire() {
        let deadline = Deadline::never();
        assert!(!deadline.is_expired());
        assert_eq!(deadline.remaining(), None);

        let fired = tokio::time::timeout(Duration::from_secs(3600), deadline.expired()).await;
        assert!(fired.is_err());
    }
}
