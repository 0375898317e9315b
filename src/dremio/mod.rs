//! Dremio API interaction module
//!
//! This module provides the typed REST surface the resource adapters call, including
//! authentication, the HTTP client and the wire models.
//!
//! # Module Structure
//!
//! - [`api`] - The [`DremioApi`] trait adapters are written against
//! - [`auth`] - API key and username/password session authentication
//! - [`client`] - REST implementation of [`DremioApi`]
//! - [`http`] - HTTP utilities for REST API calls
//! - [`models`] - Request and response payloads
//!
//! # Example
//!
//! ```ignore
//! use dremio_provider::dremio::{Credentials, DremioApi, DremioClient};
//!
//! async fn example() -> dremio_provider::error::Result<()> {
//!     let client = DremioClient::new("http://localhost:9047", Credentials::ApiKey(key))?;
//!     let entity = client.get_catalog_entity_by_path(&["Samples".to_string()]).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod http;
pub mod models;

pub use api::DremioApi;
pub use auth::Credentials;
pub use client::DremioClient;
