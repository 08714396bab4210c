use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::middleware::MiddlewareChain;
use crate::modules::auth::router::init_auth_router;
use crate::modules::health::router::init_health_router;
use crate::modules::students::router::init_students_router;
use crate::state::AppState;

/// Builds the application router.
///
/// Every API route sits behind the standard chain; `/students` additionally
/// sits behind the auth stage. Swagger UI is mounted outside the chain so it
/// keeps its own content types.
pub fn init_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(MiddlewareChain::protected(&state).route_layer(init_students_router()))
        .merge(init_auth_router())
        .merge(init_health_router())
        .with_state(state.clone());

    MiddlewareChain::standard(&state)
        .layer(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
