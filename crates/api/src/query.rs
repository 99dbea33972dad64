//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Page-number pagination parameters (`?page=&page_size=`).
///
/// `pageSize` is accepted as an alias. Bounds are checked by
/// [`quill_core::pagination::PageRequest::new`].
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<i64>,
}
