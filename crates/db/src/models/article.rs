//! Article entity model and DTOs.

use quill_core::recently_viewed::ArticleSnapshot;
use quill_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::user::UserResponse;

/// An `articles` row joined with its author's public columns.
///
/// Every article query returns this shape so handlers can render the
/// embedded `author` object without a second round trip.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleWithAuthor {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub author_username: String,
    pub author_email: String,
    pub author_is_active: bool,
    pub author_created_at: Timestamp,
    pub author_updated_at: Option<Timestamp>,
}

impl ArticleWithAuthor {
    /// The author's public profile as stored right now.
    pub fn author(&self) -> UserResponse {
        UserResponse {
            id: self.author_id,
            username: self.author_username.clone(),
            email: self.author_email.clone(),
            is_active: self.author_is_active,
            created_at: self.author_created_at,
            updated_at: self.author_updated_at,
        }
    }

    /// Copy the fields the recently-viewed tracker keeps.
    pub fn snapshot(&self) -> ArticleSnapshot {
        ArticleSnapshot {
            id: self.id,
            title: self.title.clone(),
            author: self.author().into(),
        }
    }
}

/// Full article representation returned by create/get/update.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleResponse {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub author: UserResponse,
}

impl From<ArticleWithAuthor> for ArticleResponse {
    fn from(row: ArticleWithAuthor) -> Self {
        let author = row.author();
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author,
        }
    }
}

/// List entry: the article without its body.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleListItem {
    pub id: DbId,
    pub title: String,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub author: UserResponse,
}

impl From<ArticleWithAuthor> for ArticleListItem {
    fn from(row: ArticleWithAuthor) -> Self {
        let author = row.author();
        Self {
            id: row.id,
            title: row.title,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author,
        }
    }
}

/// One page of the article listing.
#[derive(Debug, Clone, Serialize)]
pub struct ArticlePage {
    pub articles: Vec<ArticleListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

/// DTO for inserting an article.
#[derive(Debug)]
pub struct CreateArticle {
    pub title: String,
    pub content: String,
    pub author_id: DbId,
}

/// DTO for updating an article. `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub content: Option<String>,
}
