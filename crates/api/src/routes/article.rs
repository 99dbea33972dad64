//! Route definitions for the `/articles` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::article;
use crate::state::AppState;

/// Routes mounted at `/articles`.
///
/// ```text
/// GET    /                     -> list
/// POST   /                     -> create
/// GET    /recently-viewed/me   -> recently_viewed
/// GET    /{id}                 -> get_by_id
/// PUT    /{id}                 -> update
/// DELETE /{id}                 -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(article::list).post(article::create))
        .route("/recently-viewed/me", get(article::recently_viewed))
        .route(
            "/{id}",
            get(article::get_by_id)
                .put(article::update)
                .delete(article::delete),
        )
}
