//! Repository for the `articles` table.
//!
//! Every read joins `users` so callers get an [`ArticleWithAuthor`].

use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::article::{ArticleWithAuthor, CreateArticle, UpdateArticle};

/// Joined column list; `a` is the article row, `u` its author.
const COLUMNS: &str = "\
    a.id, a.title, a.content, a.author_id, a.created_at, a.updated_at, \
    u.username AS author_username, u.email AS author_email, \
    u.is_active AS author_is_active, u.created_at AS author_created_at, \
    u.updated_at AS author_updated_at";

/// Provides CRUD operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert a new article, returning it joined with its author.
    pub async fn create(
        pool: &PgPool,
        input: &CreateArticle,
    ) -> Result<ArticleWithAuthor, sqlx::Error> {
        let query = format!(
            "WITH a AS (
                INSERT INTO articles (title, content, author_id)
                VALUES ($1, $2, $3)
                RETURNING *
             )
             SELECT {COLUMNS} FROM a JOIN users u ON u.id = a.author_id"
        );
        sqlx::query_as::<_, ArticleWithAuthor>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    /// Find an article by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ArticleWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles a JOIN users u ON u.id = a.author_id
             WHERE a.id = $1"
        );
        sqlx::query_as::<_, ArticleWithAuthor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of articles, newest first.
    ///
    /// `limit` and `offset` should already be validated by the caller.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ArticleWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles a JOIN users u ON u.id = a.author_id
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ArticleWithAuthor>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of articles.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Update an article. Only non-`None` fields in `input` are applied and
    /// `updated_at` is stamped.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArticle,
    ) -> Result<Option<ArticleWithAuthor>, sqlx::Error> {
        let query = format!(
            "WITH a AS (
                UPDATE articles SET
                    title = COALESCE($2, title),
                    content = COALESCE($3, content),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM a JOIN users u ON u.id = a.author_id"
        );
        sqlx::query_as::<_, ArticleWithAuthor>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an article by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
