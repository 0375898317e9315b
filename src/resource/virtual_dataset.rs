//! `dremio_virtual_dataset`: a view defined by SQL, created under a parent entity

use super::dataset::dataset_schema;
use super::lifecycle::{Resource, ResourceData};
use super::schema::{AttrType, Attribute, Schema};
use crate::catalog::resolve_absolute_path;
use crate::codec::dataset::DatasetCommonAttrs;
use crate::dremio::models::{NewVirtualDatasetSpec, UpdateVirtualDatasetSpec};
use crate::dremio::DremioApi;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualDatasetAttrs {
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sql: String,
    #[serde(default)]
    pub sql_context: Vec<String>,
    #[serde(flatten)]
    pub common: DatasetCommonAttrs,
}

pub struct VirtualDatasetResource;

impl Resource for VirtualDatasetResource {
    const TYPE_NAME: &'static str = "dremio_virtual_dataset";

    type Attrs = VirtualDatasetAttrs;

    fn schema() -> Schema {
        dataset_schema(
            Schema::new()
                .with("parent_id", Attribute::required(AttrType::String).force_new())
                .with("name", Attribute::required(AttrType::String).force_new())
                .with("sql", Attribute::required(AttrType::String))
                .with("sql_context", Attribute::optional(AttrType::string_list())),
        )
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let attrs = &data.attrs;
        let path = resolve_absolute_path(
            client,
            &[],
            &attrs.parent_id,
            std::slice::from_ref(&attrs.name),
        )
        .await?;

        let spec = NewVirtualDatasetSpec {
            path,
            sql: attrs.sql.clone(),
            sql_context: attrs.sql_context.clone(),
        };
        let vds = client.new_virtual_dataset(&spec).await?;
        tracing::info!("Created virtual dataset {:?} ({})", spec.path, vds.dataset.id);
        data.set_id(vds.dataset.id);
        Self::read(client, data).await
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let vds = client.get_virtual_dataset(data.id()?).await?;
        data.attrs.common = DatasetCommonAttrs::from_dataset(&vds.dataset);
        data.attrs.sql = vds.sql;
        data.attrs.sql_context = vds.sql_context;
        Ok(())
    }

    async fn update<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let spec = UpdateVirtualDatasetSpec {
            sql: data.attrs.sql.clone(),
            sql_context: data.attrs.sql_context.clone(),
        };
        client.update_virtual_dataset(data.id()?, &spec).await?;
        data.touch();
        Self::read(client, data).await
    }

    async fn delete<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        client.delete_catalog_item(data.id()?).await?;
        data.clear_id();
        Ok(())
    }
}
