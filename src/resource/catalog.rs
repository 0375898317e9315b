//! `dremio_catalog`: look up any catalog entity by path
//!
//! Available both as a data source and as a resource. The resource only tracks the
//! entity it found; deleting it forgets the id and leaves the entity alone.

use super::lifecycle::{DataSource, Resource, ResourceData};
use super::schema::{AttrType, Attribute, Schema};
use crate::catalog::{query_path, resolve_absolute_path};
use crate::dremio::models::CatalogEntity;
use crate::dremio::DremioApi;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogAttrs {
    pub absolute_path: Vec<String>,
    pub relative_path: Vec<String>,
    pub parent_id: String,
    pub path: Vec<String>,
    pub query_path: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

impl CatalogAttrs {
    async fn lookup<C: DremioApi>(&self, client: &C) -> Result<CatalogEntity> {
        let path = resolve_absolute_path(
            client,
            &self.absolute_path,
            &self.parent_id,
            &self.relative_path,
        )
        .await?;
        tracing::info!("Absolute path is {:?}", path);
        client.get_catalog_entity_by_path(&path).await
    }

    fn read_from(&mut self, entity: CatalogEntity) {
        self.query_path = query_path(&entity.path);
        self.path = entity.path;
        self.entity_type = entity.entity_type;
    }
}

fn catalog_schema(lookup: fn(AttrType) -> Attribute) -> Schema {
    Schema::new()
        .with("absolute_path", lookup(AttrType::string_list()))
        .with("relative_path", lookup(AttrType::string_list()))
        .with("parent_id", lookup(AttrType::String))
        .with("path", Attribute::computed(AttrType::string_list()))
        .with("query_path", Attribute::computed(AttrType::String))
        .with("type", Attribute::computed(AttrType::String))
}

pub struct CatalogResource;

impl Resource for CatalogResource {
    const TYPE_NAME: &'static str = "dremio_catalog";

    type Attrs = CatalogAttrs;

    fn schema() -> Schema {
        catalog_schema(|ty| Attribute::optional(ty).force_new())
    }

    fn supports_update() -> bool {
        false
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let target = data.attrs.lookup(client).await?;
        tracing::info!("Target is {:?}", target);
        data.set_id(target.id);
        Self::read(client, data).await
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let target = client.get_catalog_entity_by_id(data.id()?).await?;
        data.attrs.read_from(target);
        Ok(())
    }

    async fn delete<C: DremioApi>(_client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        data.clear_id();
        Ok(())
    }
}

pub struct CatalogDataSource;

impl DataSource for CatalogDataSource {
    const TYPE_NAME: &'static str = "dremio_catalog";

    type Attrs = CatalogAttrs;

    fn schema() -> Schema {
        catalog_schema(Attribute::optional)
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let mut target = data.attrs.lookup(client).await?;
        tracing::info!("Target is {:?}", target);
        let id = std::mem::take(&mut target.id);
        data.attrs.read_from(target);
        data.set_id(id);
        Ok(())
    }
}
