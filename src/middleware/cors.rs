use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::Request,
    http::{Method, header},
    middleware::Next,
    response::Response,
};
use tower::{Layer, ServiceExt, service_fn};
use tower_http::cors::{AllowOrigin, CorsLayer};

use registrar_config::CorsConfig;

use super::Stage;

/// Adds the CORS headers to every response. `CorsLayer` answers every
/// `OPTIONS` request itself, so a preflight never reaches authentication.
#[derive(Debug, Clone)]
pub struct CorsStage {
    layer: CorsLayer,
}

impl CorsStage {
    pub fn new(config: CorsConfig) -> Self {
        let allow_origin = if config.allows_any_origin() {
            AllowOrigin::any()
        } else {
            AllowOrigin::predicate(move |origin, _| {
                origin.to_str().is_ok_and(|origin| config.allows(origin))
            })
        };

        let layer = CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        Self { layer }
    }
}

#[async_trait]
impl Stage for CorsStage {
    fn name(&self) -> &'static str {
        "cors"
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

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
    };

    use super::*;
    use crate::middleware::MiddlewareChain;

    fn app(origins: &[&str]) -> Router {
        let stage = CorsStage::new(CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
        });
        MiddlewareChain::builder()
            .stage(stage)
            .build()
            .layer(Router::new().route("/", get(|| async { "ok" })))
    }

    fn request(method: Method, origin: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().method(method).uri("/");
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_wildcard_origin() {
        let response = app(&["*"])
            .oneshot(request(Method::GET, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        let response = app(&["*"])
            .oneshot(request(Method::OPTIONS, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET,POST,PUT,DELETE,OPTIONS"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "content-type,authorization"
        );
    }

    #[tokio::test]
    async fn test_listed_origin_is_echoed() {
        let response = app(&["https://app.example.com"])
            .oneshot(request(Method::GET, Some("https://app.example.com")))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example.com"
        );
        assert!(response.headers().contains_key(header::VARY));
    }

    #[tokio::test]
    async fn test_unlisted_origin_gets_no_allow_origin() {
        let response = app(&["https://app.example.com"])
            .oneshot(request(Method::GET, Some("https://evil.example.com")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            !response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }
}
