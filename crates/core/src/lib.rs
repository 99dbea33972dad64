//! Domain types and pure logic shared by the Quill API and database crates.
//!
//! Nothing in this crate performs I/O. The recently-viewed tracker lives here
//! so it can be exercised without a database or an HTTP stack.

pub mod error;
pub mod pagination;
pub mod recently_viewed;
pub mod types;
pub mod validation;
