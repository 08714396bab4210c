mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use common::{
    ADMIN_TOKEN, body_json, empty_request, jwt_config, register, send, setup_test_app,
    test_state, token_header,
};
use registrar::middleware::{AuthUser, Deadline, MiddlewareChain};
use registrar::registrar_config::{CorsConfig, ServerConfig};
use registrar::registrar_core::AppError;
use registrar::registrar_db::{InMemoryStudentStore, StoreError, StudentStore};
use registrar::registrar_models::{NewStudent, Student, StudentChanges};
use registrar::router::init_router;
use registrar::state::AppState;
use tokio::task::JoinSet;

const JSON: &str = "application/json; charset=UTF-8";

#[test]
fn test_standard_chain_order() {
    let state = test_state();
    assert_eq!(
        MiddlewareChain::standard(&state).names(),
        vec!["content_type", "deadline", "logging", "cors", "recover"]
    );
    assert_eq!(MiddlewareChain::protected(&state).names(), vec!["auth"]);
}

#[tokio::test]
async fn test_every_response_is_json() {
    let (app, state) = setup_test_app();
    let (id, token) = register(&app, &state, "Ada").await;

    let requests = vec![
        empty_request("GET", "/health", None),
        empty_request("GET", "/students", None),
        empty_request("GET", "/students", Some(&token_header(&token))),
        empty_request("OPTIONS", "/students", None),
        empty_request("DELETE", &format!("/students/{}", id), Some(ADMIN_TOKEN)),
    ];

    for request in requests {
        let response = send(&app, request).await;
        assert_eq!(response.headers()["content-type"], JSON);
    }
}

#[tokio::test]
async fn test_preflight_is_answered_before_auth() {
    let (app, _) = setup_test_app();

    let response = send(&app, empty_request("OPTIONS", "/students/5", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET,POST,PUT,DELETE,OPTIONS"
    );
    assert_eq!(
        headers["access-control-allow-headers"],
        "content-type,authorization"
    );
}

#[tokio::test]
async fn test_cors_headers_on_denials() {
    let (app, _) = setup_test_app();

    let response = send(&app, empty_request("DELETE", "/students/5", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_configured_origin_is_echoed() {
    let state = AppState::new(
        Arc::new(InMemoryStudentStore::new()),
        &jwt_config(),
        CorsConfig {
            allowed_origins: vec!["https://app.example.com".to_string()],
        },
        ServerConfig::default(),
    );
    let app = init_router(state);

    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/students")
        .header("origin", "https://app.example.com")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://app.example.com"
    );
}

async fn boom() -> &'static str {
    panic!("handler exploded")
}

#[tokio::test]
async fn test_panic_becomes_internal_error() {
    let state = test_state();
    let app = MiddlewareChain::standard(&state).layer(
        Router::new()
            .route("/boom", get(boom))
            .route("/fine", get(|| async { "{}" })),
    );

    let response = send(&app, empty_request("GET", "/boom", None)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()["content-type"], JSON);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(body_json(response).await["error"], "Internal Server Error");

    // the same app keeps serving, concurrently and afterwards
    let mut set = JoinSet::new();
    for i in 0..20 {
        let app = app.clone();
        let uri = if i % 2 == 0 { "/boom" } else { "/fine" };
        set.spawn(async move { (uri, send(&app, empty_request("GET", uri, None)).await.status()) });
    }
    while let Some(result) = set.join_next().await {
        let (uri, status) = result.unwrap();
        let expected = if uri == "/boom" {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };
        assert_eq!(status, expected);
    }

    let response = send(&app, empty_request("GET", "/fine", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test(start_paused = true)]
async fn test_handler_observes_deadline() {
    let mut state = test_state();
    state.server_config = ServerConfig {
        request_timeout: Duration::from_secs(2),
    };

    let app = MiddlewareChain::standard(&state).layer(Router::new().route(
        "/slow",
        get(|deadline: Deadline| async move {
            deadline
                .try_run(async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok::<_, AppError>("done")
                })
                .await
        }),
    ));

    let response = send(&app, empty_request("GET", "/slow", None)).await;
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body_json(response).await["error"], "Gateway Timeout");
}

#[tokio::test(start_paused = true)]
async fn test_deadline_is_attached_with_configured_timeout() {
    let mut state = test_state();
    state.server_config = ServerConfig {
        request_timeout: Duration::from_secs(5),
    };

    let app = MiddlewareChain::standard(&state).layer(Router::new().route(
        "/remaining",
        get(|deadline: Deadline| async move {
            let remaining = deadline.remaining().map(|d| d.as_secs()).unwrap_or(0);
            format!("{{\"remaining\":{}}}", remaining)
        }),
    ));

    let response = send(&app, empty_request("GET", "/remaining", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["remaining"], 5);
}

/// Store whose every call outlives any reasonable deadline.
struct StalledStore;

#[async_trait]
impl StudentStore for StalledStore {
    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }

    async fn get(&self, id: i32) -> Result<Student, StoreError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(StoreError::NotFound(id))
    }

    async fn insert(&self, _student: NewStudent) -> Result<Student, StoreError> {
        std::future::pending().await
    }

    async fn update(&self, _id: i32, _changes: StudentChanges) -> Result<Student, StoreError> {
        std::future::pending().await
    }

    async fn delete(&self, _id: i32) -> Result<(), StoreError> {
        std::future::pending().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn test_stalled_store_answers_gateway_timeout() {
    let state = AppState::new(
        Arc::new(StalledStore),
        &jwt_config(),
        CorsConfig::default(),
        ServerConfig::default(),
    );
    let app = init_router(state);

    let response = send(&app, empty_request("GET", "/students", Some(ADMIN_TOKEN))).await;
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

    let response = send(&app, empty_request("GET", "/ready", None)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "unavailable");
}

async fn whoami(Path(id): Path<i32>, AuthUser(identity): AuthUser) -> String {
    tokio::task::yield_now().await;
    let subject = identity.subject_id().unwrap_or(-1);
    format!("{{\"path\":{},\"subject\":{}}}", id, subject)
}

#[tokio::test]
async fn test_concurrent_identities_do_not_leak() {
    let (app, state) = setup_test_app();

    let mut tokens = Vec::new();
    for i in 0..25 {
        tokens.push(register(&app, &state, &format!("Student {}", i)).await);
    }

    let app: Router = MiddlewareChain::standard(&state).layer(
        MiddlewareChain::protected(&state)
            .route_layer(Router::new().route("/whoami/{id}", axum::routing::put(whoami)))
            .with_state(state.clone()),
    );

    let mut set = JoinSet::new();
    for (id, token) in tokens {
        let app = app.clone();
        set.spawn(async move {
            let response = send(
                &app,
                empty_request("PUT", &format!("/whoami/{}", id), Some(&token_header(&token))),
            )
            .await;
            (id, response.status(), body_json(response).await)
        });
    }

    while let Some(result) = set.join_next().await {
        let (id, status, body) = result.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["path"], id);
        assert_eq!(body["subject"], id);
    }
}

#[tokio::test]
async fn test_identity_attached_for_admin() {
    let state = test_state();
    let app: Router = MiddlewareChain::protected(&state)
        .route_layer(Router::new().route(
            "/me",
            get(|AuthUser(identity): AuthUser| async move { identity.label().to_string() }),
        ))
        .with_state(state.clone());

    let response = send(&app, empty_request("GET", "/me", Some(ADMIN_TOKEN))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    assert_eq!(&body[..], b"admin");
}

#[tokio::test]
async fn test_ready_with_healthy_store() {
    let (app, _) = setup_test_app();

    let response = send(&app, empty_request("GET", "/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");

    let response = send(&app, empty_request("GET", "/ready", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ready");
}
