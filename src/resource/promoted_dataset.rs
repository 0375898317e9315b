//! `dremio_promoted_dataset`: promotes a file or folder of a source to a dataset

use super::dataset::{physical_dataset_schema, read_physical_common, DatasetLocationAttrs};
use super::lifecycle::{Resource, ResourceData};
use super::schema::{AttrType, Attribute, Schema};
use crate::codec::dataset::{AccelerationAttrs, DatasetCommonAttrs, FormatAttrs};
use crate::dremio::models::{NewPhysicalDatasetSpec, UpdatePhysicalDatasetSpec};
use crate::dremio::DremioApi;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromotedDatasetAttrs {
    #[serde(flatten)]
    pub location: DatasetLocationAttrs,
    #[serde(flatten)]
    pub format: FormatAttrs,
    #[serde(flatten)]
    pub acceleration: AccelerationAttrs,
    #[serde(flatten)]
    pub common: DatasetCommonAttrs,
}

fn format_schema(base: Schema) -> Schema {
    let text = |name: &str, schema: Schema| schema.with(name, Attribute::optional(AttrType::String));
    let flag = |name: &str, schema: Schema| schema.with(name, Attribute::optional(AttrType::Bool));

    let base = base.with("type", Attribute::required(AttrType::String));
    let base = ["field_delimiter", "line_delimiter", "quote", "comment", "escape", "sheet_name"]
        .into_iter()
        .fold(base, |schema, name| text(name, schema));
    [
        "skip_first_line",
        "extract_header",
        "trim_header",
        "auto_generate_column_names",
        "has_merged_cells",
    ]
    .into_iter()
    .fold(base, |schema, name| flag(name, schema))
}

pub struct PromotedDatasetResource;

impl Resource for PromotedDatasetResource {
    const TYPE_NAME: &'static str = "dremio_promoted_dataset";

    type Attrs = PromotedDatasetAttrs;

    fn schema() -> Schema {
        physical_dataset_schema(format_schema(Schema::new()))
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let policy = data.attrs.acceleration.to_policy()?;
        let path = data.attrs.location.resolve(client).await?;
        tracing::info!("Fetching target by path: {:?}", path);
        let original = client.get_catalog_entity_by_path(&path).await?;
        tracing::info!("Promoting {:?} ({})", original.path, original.id);

        let spec = NewPhysicalDatasetSpec {
            path: original.path,
            format: data.attrs.format.to_format(),
            acceleration_refresh_policy: policy,
        };
        let pds = client.new_physical_dataset(&original.id, &spec).await?;
        data.set_id(pds.dataset.id);
        Self::read(client, data).await
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let pds = client.get_physical_dataset(data.id()?).await?;
        let attrs = &mut data.attrs;
        attrs.format = FormatAttrs::from_format(pds.format.as_ref());
        read_physical_common(&mut attrs.acceleration, &mut attrs.common, &pds);
        Ok(())
    }

    async fn update<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let spec = UpdatePhysicalDatasetSpec {
            format: Some(data.attrs.format.to_format()),
            acceleration_refresh_policy: Some(data.attrs.acceleration.to_policy()?),
        };
        client.update_physical_dataset(data.id()?, &spec).await?;
        data.touch();
        Self::read(client, data).await
    }

    async fn delete<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        client.delete_catalog_item(data.id()?).await?;
        data.clear_id();
        Ok(())
    }
}
