//! Bearer-token authentication for handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use quill_core::error::CoreError;
use quill_core::types::DbId;

use crate::auth::jwt::decode_access_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller, as identified by a valid `Authorization: Bearer <token>` header.
///
/// Adding it to a handler's arguments makes the route require authentication;
/// a missing or invalid token is rejected with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = decode_access_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Could not validate credentials"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
        })
    }
}

/// Pull the token out of the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Not authenticated"))?
        .to_str()
        .map_err(|_| unauthorized("Could not validate credentials"))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token.trim())
        }
        _ => Err(unauthorized("Not authenticated")),
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}
