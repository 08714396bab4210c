#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use registrar::registrar_config::{CorsConfig, JwtConfig, ServerConfig};
use registrar::registrar_db::{InMemoryStudentStore, StudentStore};
use registrar::router::init_router;
use registrar::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &str = "test-secret-key-at-least-32-characters-long";
pub const ADMIN_TOKEN: &str = "admin-bypass-token";

pub fn jwt_config() -> JwtConfig {
    JwtConfig::with_secret(SECRET).admin_token(ADMIN_TOKEN)
}

pub fn test_state_with_store(store: Arc<dyn StudentStore>) -> AppState {
    AppState::new(
        store,
        &jwt_config(),
        CorsConfig::default(),
        ServerConfig::default(),
    )
}

pub fn test_state() -> AppState {
    test_state_with_store(Arc::new(InMemoryStudentStore::new()))
}

pub fn setup_test_app() -> (Router, AppState) {
    let state = test_state();
    (init_router(state.clone()), state)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

/// Registers `name` and returns the new record's id and its token.
pub async fn register(app: &Router, state: &AppState, name: &str) -> (i32, String) {
    let request = json_request(
        "POST",
        "/register",
        None,
        json!({ "name": name, "password": "password123", "course": "History", "grade": "A" }),
    );
    let response = send(app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();
    let subject_id = state.codec.verify(&token).unwrap().user_id;
    (subject_id, token)
}

pub fn token_header(token: &str) -> String {
    format!("Token {}", token)
}
