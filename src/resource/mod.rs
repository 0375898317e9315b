//! Resource abstraction layer
//!
//! Lifecycle adapters for every Dremio entity kind the provider manages, the schemas
//! describing their attributes, and the dispatch layer a host drives by type name.
//!
//! # Architecture
//!
//! - [`lifecycle`] - [`Resource`] / [`DataSource`] traits and [`ResourceData`] state
//! - [`schema`] - typed attribute descriptions and configuration validation
//! - [`registry`] - type name to kind lookup and cached schemas
//! - [`dispatch`] - [`Provider`], routing JSON states to the typed adapters
//!
//! # Example
//!
//! ```ignore
//! use dremio_provider::dremio::{Credentials, DremioClient};
//! use dremio_provider::resource::Provider;
//! use serde_json::json;
//!
//! async fn make_space(url: &str, key: &str) {
//!     let client = DremioClient::new(url, Credentials::ApiKey(key.to_string())).unwrap();
//!     let provider = Provider::new(client);
//!     let response = provider.create("dremio_space", json!({ "name": "Analytics" })).await;
//!     println!("{}", response.state);
//! }
//! ```

pub mod catalog;
pub mod collaboration;
pub mod dataset;
pub mod dispatch;
pub mod folder;
pub mod lifecycle;
pub mod physical_dataset;
pub mod promoted_dataset;
pub mod reflection;
pub mod registry;
pub mod schema;
pub mod source;
pub mod space;
pub mod summary;
pub mod virtual_dataset;

pub use dispatch::{Operation, Provider, Response};
pub use lifecycle::{DataSource, Resource, ResourceData};
pub use registry::*;
pub use schema::{AttrType, Attribute, Presence, Schema};
