//! Request pipeline.
//!
//! A [`Stage`] sees a request on the way in and the response on the way out,
//! and either delegates to the rest of the chain through [`Next`] or answers
//! itself. A [`MiddlewareChain`] is an ordered, immutable list of stages built
//! once at startup and shared by every request.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::Request,
    middleware::{Next, from_fn},
    response::Response,
};

use crate::state::AppState;

pub mod auth;
pub mod content_type;
pub mod cors;
pub mod deadline;
pub mod logging;
pub mod recover;

pub use auth::{AuthStage, AuthUser};
pub use content_type::ContentTypeStage;
pub use cors::CorsStage;
pub use deadline::{Deadline, DeadlineExceeded, DeadlineStage};
pub use logging::LoggingStage;
pub use recover::RecoverStage;

#[async_trait]
pub trait Stage: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn handle(&self, req: Request, next: Next) -> Response;
}

#[derive(Clone, Default)]
pub struct MiddlewareChain {
    stages: Vec<Arc<dyn Stage>>,
}

#[derive(Default)]
pub struct ChainBuilder {
    stages: Vec<Arc<dyn Stage>>,
}

impl ChainBuilder {
    /// Appends a stage. Stages added earlier run further out.
    pub fn stage<T: Stage>(mut self, stage: T) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn build(self) -> MiddlewareChain {
        MiddlewareChain {
            stages: self.stages,
        }
    }
}

impl MiddlewareChain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder::default()
    }

    /// The outer stages every request passes through, outermost first.
    pub fn standard(state: &AppState) -> Self {
        Self::builder()
            .stage(ContentTypeStage::new())
            .stage(DeadlineStage::new(state.server_config.request_timeout))
            .stage(LoggingStage)
            .stage(CorsStage::new(state.cors_config.clone()))
            .stage(RecoverStage)
            .build()
    }

    /// Stages for the authenticated route group.
    pub fn protected(state: &AppState) -> Self {
        Self::builder()
            .stage(AuthStage::new(state.resolver.clone()))
            .build()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Wraps every route of `router` (and its fallback).
    pub fn layer<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        // axum makes the last layer added the outermost one.
        self.stages.iter().rev().fold(router, |router, stage| {
            let stage = Arc::clone(stage);
            router.layer(from_fn(move |req: Request, next: Next| {
                let stage = Arc::clone(&stage);
                async move { stage.handle(req, next).await }
            }))
        })
    }

    /// Wraps only the routes of `router` that match a request.
    pub fn route_layer<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.stages.iter().rev().fold(router, |router, stage| {
            let stage = Arc::clone(stage);
            router.route_layer(from_fn(move |req: Request, next: Next| {
                let stage = Arc::clone(&stage);
                async move { stage.handle(req, next).await }
            }))
        })
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
