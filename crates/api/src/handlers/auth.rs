//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::{Form, Json};
use quill_core::error::CoreError;
use quill_core::validation::validate_input;
use quill_db::models::user::{CreateUser, UserResponse};
use quill_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::issue_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Message returned for any login failure that must not reveal which part was wrong.
const BAD_CREDENTIALS: &str = "Incorrect username or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub username: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 100, message = "must be at most 100 characters")
    )]
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
///
/// Extra OAuth2 password-flow fields (`grant_type`, `scope`, ...) are ignored.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login credentials from either an `application/x-www-form-urlencoded` body
/// (OAuth2 password form) or a JSON body.
#[derive(Debug)]
pub struct LoginCredentials(pub LoginRequest);

impl<S> FromRequest<S> for LoginCredentials
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let input = if is_form {
            Form::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?
                .0
        } else {
            Json::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?
                .0
        };
        Ok(Self(input))
    }
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Create an account. Returns 201 with the public user profile.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_input(&input)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Username already registered".into()));
    }
    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // A concurrent registration can still win the race; `uq_users_*`
    // violations come back through `AppError::Database` as the same 400.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /auth/login
///
/// Authenticate with username + password, sent as a form or as JSON.
/// Returns a bearer access token.
pub async fn login(
    State(state): State<AppState>,
    LoginCredentials(input): LoginCredentials,
) -> AppResult<Json<TokenResponse>> {
    let Some(user) = UserRepo::find_by_username(&state.pool, &input.username).await? else {
        tracing::info!(username = %input.username, "Login failed: unknown user");
        return Err(AppError::Core(CoreError::Unauthorized(BAD_CREDENTIALS.into())));
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(BAD_CREDENTIALS.into())));
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let issued = issue_access_token(user.id, &user.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(TokenResponse {
        access_token: issued.token,
        token_type: "bearer",
        expires_in: issued.expires_in,
    }))
}

/// GET /auth/me
///
/// Return the caller's profile. A token for a user that no longer exists is
/// treated as invalid.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Could not validate credentials".into(),
            ))
        })?;
    Ok(Json(UserResponse::from(&user)))
}
