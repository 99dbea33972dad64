use std::sync::Arc;

use quill_core::recently_viewed::RecentlyViewedTracker;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: quill_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Per-user recently viewed articles. Created once at startup, in-memory only.
    pub recently_viewed: Arc<RecentlyViewedTracker>,
}

impl AppState {
    /// Build state with a fresh tracker sized from `config`.
    pub fn new(pool: quill_db::DbPool, config: ServerConfig) -> Self {
        let recently_viewed = Arc::new(RecentlyViewedTracker::new(
            config.recently_viewed_capacity,
        ));
        Self {
            pool,
            config: Arc::new(config),
            recently_viewed,
        }
    }
}
