//! In-memory "recently viewed articles" tracker.
//!
//! Each user owns a bounded, deduplicated, most-recent-first list of
//! [`ViewRecord`]s. Nothing is persisted: histories live for the lifetime of
//! the [`RecentlyViewedTracker`] instance held in application state.
//!
//! Locking is two-level. The outer map is write-locked only to create or
//! drop a user's history; every mutation of one history happens under that
//! history's own mutex, so the remove -> insert-front -> trim sequence is
//! atomic per user while different users never wait on each other's
//! history.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::Utc;
use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// Default number of entries kept per user.
pub const DEFAULT_MAX_RECENT_ITEMS: usize = 10;

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// Author fields copied into a view record at the time of the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSnapshot {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// The article data the API layer hands to [`RecentlyViewedTracker::record_view`]
/// right after a successful single-article fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSnapshot {
    pub id: DbId,
    pub title: String,
    pub author: AuthorSnapshot,
}

/// One user's view of one article.
///
/// Serializes as `{id, title, author_id, viewed_at, author: {...}}`, the
/// shape returned by `GET /articles/recently-viewed/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRecord {
    #[serde(rename = "id")]
    pub article_id: DbId,
    pub title: String,
    pub author_id: DbId,
    pub viewed_at: Timestamp,
    pub author: AuthorSnapshot,
}

impl ViewRecord {
    fn new(article: ArticleSnapshot, viewed_at: Timestamp) -> Self {
        Self {
            article_id: article.id,
            title: article.title,
            author_id: article.author.id,
            viewed_at,
            author: article.author,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-user history
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct UserViewHistory {
    entries: VecDeque<ViewRecord>,
}

impl UserViewHistory {
    fn insert_front(&mut self, record: ViewRecord, capacity: usize) {
        self.entries.retain(|r| r.article_id != record.article_id);
        self.entries.push_front(record);
        self.entries.truncate(capacity);
    }
}

type SharedHistory = Arc<Mutex<UserViewHistory>>;

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Tracks the most recently viewed articles for every user.
///
/// Designed to be wrapped in `Arc` and shared across request handlers.
/// None of its operations can fail. A poisoned lock is recovered, not
/// propagated.
#[derive(Debug)]
pub struct RecentlyViewedTracker {
    capacity: usize,
    histories: RwLock<HashMap<DbId, SharedHistory>>,
}

impl Default for RecentlyViewedTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECENT_ITEMS)
    }
}

impl RecentlyViewedTracker {
    /// Create an empty tracker keeping at most `capacity` entries per user.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            histories: RwLock::new(HashMap::new()),
        }
    }

    /// Maximum number of entries kept per user.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record that `user_id` just viewed `article`.
    ///
    /// An existing entry for the same article is replaced and the new entry
    /// goes to the front. Entries beyond capacity are dropped from the back.
    pub fn record_view(&self, user_id: DbId, article: ArticleSnapshot) {
        let history = self.history_for(user_id);
        let mut history = lock(&history);
        let record = ViewRecord::new(article, Utc::now());
        history.insert_front(record, self.capacity);
    }

    /// Return the user's history, most recent first.
    ///
    /// Unknown users get an empty list.
    pub fn get_recently_viewed(&self, user_id: DbId) -> Vec<ViewRecord> {
        let history = {
            let map = self.histories.read().unwrap_or_else(PoisonError::into_inner);
            match map.get(&user_id) {
                Some(history) => Arc::clone(history),
                None => return Vec::new(),
            }
        };
        let history = lock(&history);
        history.entries.iter().cloned().collect()
    }

    /// Drop the user's entire history. No-op if the user has none.
    pub fn clear_user_history(&self, user_id: DbId) {
        self.histories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&user_id);
    }

    /// Number of users that currently have a history.
    pub fn tracked_users(&self) -> usize {
        self.histories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn history_for(&self, user_id: DbId) -> SharedHistory {
        if let Some(history) = self
            .histories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
        {
            return Arc::clone(history);
        }

        let mut map = self.histories.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(user_id).or_default())
    }
}

fn lock(history: &SharedHistory) -> MutexGuard<'_, UserViewHistory> {
    history.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
