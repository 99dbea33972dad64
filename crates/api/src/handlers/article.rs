//! Handlers for the `/articles` resource.
//!
//! Every endpoint requires authentication. Reading a single article also
//! records the view in the in-memory recently-viewed tracker.

use std::panic::{catch_unwind, AssertUnwindSafe};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use quill_core::error::CoreError;
use quill_core::pagination::{total_pages, PageRequest};
use quill_core::recently_viewed::{RecentlyViewedTracker, ViewRecord};
use quill_core::types::DbId;
use quill_core::validation::validate_input;
use quill_db::models::article::{
    ArticlePage, ArticleResponse, ArticleWithAuthor, CreateArticle, UpdateArticle,
};
use quill_db::repositories::ArticleRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /articles`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub content: String,
}

/// Request body for `PUT /articles/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateArticleRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /articles
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateArticleRequest>,
) -> AppResult<(StatusCode, Json<ArticleResponse>)> {
    validate_input(&input)?;

    let article = ArticleRepo::create(
        &state.pool,
        &CreateArticle {
            title: input.title,
            content: input.content,
            author_id: auth.user_id,
        },
    )
    .await?;

    tracing::info!(article_id = article.id, author_id = auth.user_id, "Article created");
    Ok((StatusCode::CREATED, Json(article.into())))
}

/// GET /articles?page=&page_size=
///
/// Newest articles first.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<ArticlePage>> {
    let page = PageRequest::new(params.page, params.page_size)?;

    let rows = ArticleRepo::list(&state.pool, page.limit(), page.offset()).await?;
    let total = ArticleRepo::count(&state.pool).await?;

    Ok(Json(ArticlePage {
        articles: rows.into_iter().map(Into::into).collect(),
        total,
        page: page.page,
        page_size: page.page_size,
        total_pages: total_pages(total, page.page_size),
    }))
}

/// GET /articles/{id}
///
/// Returns the article and records it as recently viewed by the caller.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ArticleResponse>> {
    let article = find_article(&state, id).await?;
    track_view(&state.recently_viewed, auth.user_id, &article);
    Ok(Json(article.into()))
}

/// PUT /articles/{id}
///
/// Only the author may update.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArticleRequest>,
) -> AppResult<Json<ArticleResponse>> {
    validate_input(&input)?;

    let article = find_article(&state, id).await?;
    if article.author_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only update your own articles".into(),
        )));
    }

    let updated = ArticleRepo::update(
        &state.pool,
        id,
        &UpdateArticle {
            title: input.title,
            content: input.content,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Article",
        id,
    }))?;

    Ok(Json(updated.into()))
}

/// DELETE /articles/{id}
///
/// Only the author may delete. Returns 204 No Content.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let article = find_article(&state, id).await?;
    if article.author_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only delete your own articles".into(),
        )));
    }

    if ArticleRepo::delete(&state.pool, id).await? {
        tracing::info!(article_id = id, author_id = auth.user_id, "Article deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))
    }
}

/// GET /articles/recently-viewed/me
///
/// The caller's recently viewed articles, most recent first. Snapshot data
/// reflects each article as it was when viewed.
pub async fn recently_viewed(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<Vec<ViewRecord>> {
    Json(state.recently_viewed.get_recently_viewed(auth.user_id))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_article(state: &AppState, id: DbId) -> AppResult<ArticleWithAuthor> {
    ArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))
}

/// Record a view without letting a tracker fault reach the response.
fn track_view(tracker: &RecentlyViewedTracker, user_id: DbId, article: &ArticleWithAuthor) {
    let snapshot = article.snapshot();
    let article_id = snapshot.id;
    contain_tracker_fault(user_id, article_id, || tracker.record_view(user_id, snapshot));
}

/// Run `record`, logging and swallowing any panic it raises.
///
/// Returns whether the view was recorded.
fn contain_tracker_fault(user_id: DbId, article_id: DbId, record: impl FnOnce()) -> bool {
    match catch_unwind(AssertUnwindSafe(record)) {
        Ok(()) => {
            tracing::debug!(user_id, article_id, "Recorded article view");
            true
        }
        Err(_) => {
            tracing::warn!(user_id, article_id, "Failed to record article view");
            false
        }
    }
}
