//! Catalog path resolution
//!
//! Entities are addressed either by an absolute path or by a parent entity id plus a
//! path relative to it. The remote service only accepts fully qualified paths, so
//! every reference is resolved to one before a lookup-by-path call.

use crate::dremio::DremioApi;
use crate::error::{ProviderError, Result};

/// A reference to a catalog entity as written in configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRef {
    Absolute(Vec<String>),
    Relative {
        parent_id: String,
        relative_path: Vec<String>,
    },
}

impl CatalogRef {
    /// Pick the addressing mode; a non-empty absolute path always wins
    pub fn from_parts(absolute: &[String], parent_id: &str, relative: &[String]) -> Result<Self> {
        if !absolute.is_empty() {
            return Ok(Self::Absolute(absolute.to_vec()));
        }
        if !parent_id.is_empty() {
            return Ok(Self::Relative {
                parent_id: parent_id.to_string(),
                relative_path: relative.to_vec(),
            });
        }
        Err(ProviderError::invalid(
            "expected either an absolute path or a parent reference",
        ))
    }

    /// Resolve to an absolute path; the relative form costs one lookup of the parent
    pub async fn resolve<C: DremioApi + ?Sized>(self, client: &C) -> Result<Vec<String>> {
        match self {
            Self::Absolute(path) => Ok(path),
            Self::Relative {
                parent_id,
                relative_path,
            } => {
                tracing::info!("Using catalog entry with id '{}' as root", parent_id);
                let parent = client.get_catalog_entity_by_id(&parent_id).await?;
                let mut path = parent.path;
                path.extend(relative_path);
                Ok(path)
            }
        }
    }
}

/// Resolve a reference given as its three optional configuration parts
pub async fn resolve_absolute_path<C: DremioApi + ?Sized>(
    client: &C,
    absolute: &[String],
    parent_id: &str,
    relative: &[String],
) -> Result<Vec<String>> {
    CatalogRef::from_parts(absolute, parent_id, relative)?
        .resolve(client)
        .await
}

/// SQL form of a path: `"a"."b"."c"`
///
/// Embedded quote characters are passed through unescaped.
pub fn query_path(path: &[String]) -> String {
    path.iter()
        .map(|segment| format!("\"{segment}\""))
        .collect::<Vec<_>>()
        .join(".")
}
