//! `dremio_physical_dataset`: manages the refresh policy of an existing dataset
//!
//! The dataset itself is never created or dropped here. Create adopts whatever entity
//! sits at the resolved path; delete resets its policy and forgets it.

use super::dataset::{physical_dataset_schema, read_physical_common, DatasetLocationAttrs};
use super::lifecycle::{Resource, ResourceData};
use super::schema::Schema;
use crate::codec::dataset::{AccelerationAttrs, DatasetCommonAttrs};
use crate::dremio::models::UpdatePhysicalDatasetSpec;
use crate::dremio::DremioApi;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalDatasetAttrs {
    #[serde(flatten)]
    pub location: DatasetLocationAttrs,
    #[serde(flatten)]
    pub acceleration: AccelerationAttrs,
    #[serde(flatten)]
    pub common: DatasetCommonAttrs,
}

pub struct PhysicalDatasetResource;

impl Resource for PhysicalDatasetResource {
    const TYPE_NAME: &'static str = "dremio_physical_dataset";

    type Attrs = PhysicalDatasetAttrs;

    fn schema() -> Schema {
        physical_dataset_schema(Schema::new())
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let spec = UpdatePhysicalDatasetSpec {
            format: None,
            acceleration_refresh_policy: Some(data.attrs.acceleration.to_policy()?),
        };
        let path = data.attrs.location.resolve(client).await?;
        tracing::info!("Fetching target by path: {:?}", path);
        let original = client.get_catalog_entity_by_path(&path).await?;
        // Adopted only once its policy is written
        client.update_physical_dataset(&original.id, &spec).await?;
        data.set_id(original.id);
        data.touch();
        Self::read(client, data).await
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let pds = client.get_physical_dataset(data.id()?).await?;
        let attrs = &mut data.attrs;
        read_physical_common(&mut attrs.acceleration, &mut attrs.common, &pds);
        Ok(())
    }

    async fn update<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let spec = UpdatePhysicalDatasetSpec {
            format: None,
            acceleration_refresh_policy: Some(data.attrs.acceleration.to_policy()?),
        };
        client.update_physical_dataset(data.id()?, &spec).await?;
        data.touch();
        Self::read(client, data).await
    }

    async fn delete<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        client
            .update_physical_dataset(data.id()?, &UpdatePhysicalDatasetSpec::default())
            .await?;
        data.clear_id();
        Ok(())
    }
}
