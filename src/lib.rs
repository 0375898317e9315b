//! Declarative lifecycle management for Dremio catalog entities, sources, datasets,
//! reflections, tags and wikis.
//!
//! A host hands [`resource::Provider`] a type name, an operation and a JSON state; the
//! provider validates it against the kind's schema, drives the Dremio REST API through
//! [`dremio::DremioClient`] and returns the refreshed state with any diagnostics.

pub mod catalog;
pub mod codec;
pub mod config;
pub mod dremio;
pub mod error;
pub mod plan;
pub mod resource;

/// Version injected at compile time via DREMIO_PROVIDER_VERSION (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("DREMIO_PROVIDER_VERSION") {
    Some(v) => v,
    None => "dev",
};
