pub mod article;
pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
/// /auth/me                            current user (requires auth)
///
/// /articles                           list, create
/// /articles/{id}                      get (records view), update, delete
/// /articles/recently-viewed/me        caller's recently viewed articles
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/articles", article::router())
}
