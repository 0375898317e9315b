//! `dremio_space`: a top-level catalog container

use super::lifecycle::{Resource, ResourceData};
use super::schema::{AttrType, Attribute, Schema};
use crate::dremio::models::NewSpaceSpec;
use crate::dremio::DremioApi;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceAttrs {
    #[serde(default)]
    pub name: String,
}

pub struct SpaceResource;

impl Resource for SpaceResource {
    const TYPE_NAME: &'static str = "dremio_space";

    type Attrs = SpaceAttrs;

    fn schema() -> Schema {
        Schema::new().with("name", Attribute::required(AttrType::String).force_new())
    }

    fn supports_update() -> bool {
        false
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let space = client
            .new_space(&NewSpaceSpec {
                name: data.attrs.name.clone(),
            })
            .await?;
        tracing::info!("Created space '{}' ({})", space.name, space.id);
        data.set_id(space.id);
        Self::read(client, data).await
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let space = client.get_space(data.id()?).await?;
        data.attrs.name = space.name;
        Ok(())
    }

    async fn delete<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        client.delete_catalog_item(data.id()?).await?;
        data.clear_id();
        Ok(())
    }
}
