#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use quill_api::auth::jwt::JwtConfig;
use quill_api::config::ServerConfig;
use quill_api::router::build_app_router;
use quill_api::state::AppState;

/// Password used for every account created by [`register_and_login`].
pub const TEST_PASSWORD: &str = "testpassword123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        recently_viewed_capacity: 10,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 30,
        },
    }
}

/// Build application state around `pool` with a fresh tracker.
pub fn build_test_state(pool: PgPool) -> AppState {
    AppState::new(pool, test_config())
}

/// Build the full application router with all middleware layers.
///
/// Clone the returned router for each request: clones share the same state,
/// including the recently-viewed tracker.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(build_test_state(pool))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

/// POST an `application/x-www-form-urlencoded` body.
pub async fn post_form(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Flow helpers
// ---------------------------------------------------------------------------

/// Register `username` (email `<username>@example.com`) and return a bearer token.
pub async fn register_and_login(app: &Router, username: &str) -> String {
    let body = serde_json::json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": TEST_PASSWORD,
    });
    let response = post_json(app.clone(), "/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = serde_json::json!({ "username": username, "password": TEST_PASSWORD });
    let response = post_json(app.clone(), "/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create an article as the token's owner and return its id.
pub async fn create_article(app: &Router, token: &str, title: &str, content: &str) -> i64 {
    let body = serde_json::json!({ "title": title, "content": content });
    let response = post_json_auth(app.clone(), "/articles", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
