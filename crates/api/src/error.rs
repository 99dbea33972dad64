//! HTTP error type.
//!
//! Every failure leaves a handler as `{"error": <message>, "code": <CODE>}`.
//! Internal details are logged and replaced by a generic message.

use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use quill_core::error::CoreError;
use serde_json::json;

/// Postgres SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request that is not a field validation failure.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Never shown to the client.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

type Classified = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(err) => classify_core(err),
            AppError::Database(err) => classify_sqlx(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };

        let mut response = (status, Json(json!({ "error": message, "code": code }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

fn classify_core(err: &CoreError) -> Classified {
    match err {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

/// `RowNotFound` is a 404 and a violated `uq_*` constraint is a 400 or 409
/// (see [`classify_unique_violation`]). Anything else is an internal error.
fn classify_sqlx(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION)
                && db_err.constraint().is_some_and(|c| c.starts_with("uq_")) =>
        {
            classify_unique_violation(db_err.constraint().unwrap_or_default())
        }
        other => internal(&other.to_string()),
    }
}

fn internal(detail: &str) -> Classified {
    tracing::error!(error = %detail, "Request failed with internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Taken usernames and emails are reported like any other bad registration
/// input (400). Other `uq_*` violations are conflicts (409).
fn classify_unique_violation(constraint: &str) -> Classified {
    match constraint {
        "uq_users_username" => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            "Username already registered".to_string(),
        ),
        "uq_users_email" => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            "Email already registered".to_string(),
        ),
        other => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {other}"),
        ),
    }
}
