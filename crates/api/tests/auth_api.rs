//! HTTP-level integration tests for the `/auth` endpoints.
//!
//! Tests cover registration (including duplicates and validation), login,
//! and the current-user endpoint.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get, get_auth, post_form, post_json, register_and_login, TEST_PASSWORD,
};
use sqlx::PgPool;

fn register_body(username: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "email": email,
        "password": TEST_PASSWORD,
    })
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/auth/register",
        register_body("testuser", "test@example.com"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["username"], "testuser");
    assert_eq!(json["email"], "test@example.com");
    assert_eq!(json["is_active"], true);
    assert!(json["id"].is_number());
    assert!(json.get("password_hash").is_none());
    assert!(json.get("hashed_password").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_username(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/auth/register", register_body("dup", "a@example.com")).await;

    let response = post_json(app, "/auth/register", register_body("dup", "b@example.com")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Username already registered");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/auth/register", register_body("first", "same@example.com")).await;

    let response =
        post_json(app, "/auth/register", register_body("second", "same@example.com")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Email already registered");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_invalid_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/auth/register", register_body("bademail", "nope")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "username": "shorty",
        "email": "shorty@example.com",
        "password": "short",
    });

    let response = post_json(app, "/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/auth/register", register_body("loginuser", "l@example.com")).await;

    let body = serde_json::json!({ "username": "loginuser", "password": TEST_PASSWORD });
    let response = post_json(app, "/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["expires_in"], 30 * 60);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_with_form_body(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/auth/register", register_body("formuser", "f@example.com")).await;

    let body = format!("grant_type=password&username=formuser&password={TEST_PASSWORD}");
    let response = post_form(app.clone(), "/auth/login", &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["token_type"], "bearer");
    let token = json["access_token"].as_str().unwrap();

    let response = get_auth(app, "/auth/me", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], "formuser");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_with_form_body_wrong_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/auth/register", register_body("formbad", "fb@example.com")).await;

    let response = post_form(app, "/auth/login", "username=formbad&password=nope-nope").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Incorrect username or password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_unknown_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "nonexistent", "password": "wrongpassword" });
    let response = post_json(app, "/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Incorrect username or password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json(app.clone(), "/auth/register", register_body("wrongpw", "w@example.com")).await;

    let body = serde_json::json!({ "username": "wrongpw", "password": "not-the-password" });
    let response = post_json(app, "/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app.clone(),
        "/auth/register",
        register_body("inactive", "i@example.com"),
    )
    .await;
    let user_id = body_json(response).await["id"].as_i64().unwrap();
    quill_db::repositories::UserRepo::deactivate(&pool, user_id)
        .await
        .unwrap();

    let body = serde_json::json!({ "username": "inactive", "password": TEST_PASSWORD });
    let response = post_json(app, "/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Current user
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_returns_profile(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(&app, "meuser").await;

    let response = get_auth(app, "/auth/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "meuser");
    assert_eq!(json["email"], "meuser@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_with_invalid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/auth/me", "invalidtoken").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("www-authenticate").unwrap(),
        "Bearer"
    );
    let json = body_json(response).await;
    assert_eq!(json["error"], "Could not validate credentials");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_without_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/auth/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
