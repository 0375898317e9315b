//! Catalog addressing
//!
//! - [`path`] - Absolute path resolution and SQL query paths

pub mod path;

pub use path::{query_path, resolve_absolute_path, CatalogRef};
