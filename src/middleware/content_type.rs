use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use tower::{Layer, ServiceExt, service_fn};
use tower_http::set_header::SetResponseHeaderLayer;

use super::Stage;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Marks every response as JSON, including ones produced by inner stages.
#[derive(Debug, Clone)]
pub struct ContentTypeStage {
    layer: SetResponseHeaderLayer<HeaderValue>,
}

impl ContentTypeStage {
    pub fn new() -> Self {
        Self {
            layer: SetResponseHeaderLayer::overriding(
                header::CONTENT_TYPE,
                HeaderValue::from_static(JSON_CONTENT_TYPE),
            ),
        }
    }
}

impl Default for ContentTypeStage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Stage for ContentTypeStage {
    fn name(&self) -> &'static str {
        "content_type"
    }

    async fn handle(&self, req: Request, next: Next) -> Response {
        let inner = service_fn(move |req: Request| {
            let next = next.clone();
            async move { Ok::<_, Infallible>(next.run(req).await) }
        });

        match self.layer.layer(inner).oneshot(req).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}
