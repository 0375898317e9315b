//! Lifecycle traits and resource state
//!
//! Each managed kind implements [`Resource`]; each read-only kind implements
//! [`DataSource`]. Adapters receive a [`ResourceData`] holding the entity id and the
//! typed attributes, mutate it in place and return the first error they hit.

use super::schema::Schema;
use crate::dremio::DremioApi;
use crate::error::{ProviderError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Layout of the `last_updated` attribute, e.g. `Monday, 02-Jan-06 15:04:05 UTC`
const LAST_UPDATED_FORMAT: &str = "%A, %d-%b-%y %H:%M:%S UTC";

/// Local state of one resource instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData<A> {
    /// Remote identity; `None` means the entity is absent
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(flatten)]
    pub attrs: A,
}

impl<A> ResourceData<A> {
    pub fn new(attrs: A) -> Self {
        Self {
            id: None,
            last_updated: None,
            attrs,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.set_id(id);
        self
    }

    /// The remote identity, required by every operation except create
    pub fn id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProviderError::invalid("resource has no id"))
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Stamp `last_updated` with the current time
    pub fn touch(&mut self) {
        self.last_updated = Some(chrono::Utc::now().format(LAST_UPDATED_FORMAT).to_string());
    }
}

/// A managed resource kind
#[allow(async_fn_in_trait)]
pub trait Resource {
    /// Host-facing type name, e.g. `dremio_space`
    const TYPE_NAME: &'static str;

    type Attrs: Serialize + DeserializeOwned + Default;

    fn schema() -> Schema;

    /// Kinds whose attributes all force replacement have no update
    fn supports_update() -> bool {
        true
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()>;

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()>;

    async fn update<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let _ = (client, data);
        Err(ProviderError::invalid(format!(
            "{} does not support in-place update",
            Self::TYPE_NAME
        )))
    }

    async fn delete<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()>;
}

/// A read-only data source kind
#[allow(async_fn_in_trait)]
pub trait DataSource {
    const TYPE_NAME: &'static str;

    type Attrs: Serialize + DeserializeOwned + Default;

    fn schema() -> Schema;

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()>;
}
