//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Serialize` response shapes for the API layer
//! - Plain create/update DTOs consumed by the repositories

pub mod article;
pub mod user;
