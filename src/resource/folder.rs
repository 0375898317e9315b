//! `dremio_folder`: a folder inside a space or home, addressed by its full path

use super::lifecycle::{Resource, ResourceData};
use super::schema::{AttrType, Attribute, Schema};
use crate::catalog::query_path;
use crate::dremio::models::NewFolderSpec;
use crate::dremio::DremioApi;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderAttrs {
    pub path: Vec<String>,
    pub query_path: String,
}

pub struct FolderResource;

impl Resource for FolderResource {
    const TYPE_NAME: &'static str = "dremio_folder";

    type Attrs = FolderAttrs;

    fn schema() -> Schema {
        Schema::new()
            .with(
                "path",
                Attribute::required(AttrType::string_list()).force_new(),
            )
            .with("query_path", Attribute::computed(AttrType::String))
    }

    fn supports_update() -> bool {
        false
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let folder = client
            .new_folder(&NewFolderSpec {
                path: data.attrs.path.clone(),
            })
            .await?;
        tracing::info!("Created folder {:?} ({})", folder.path, folder.id);
        data.set_id(folder.id);
        Self::read(client, data).await
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let folder = client.get_folder(data.id()?).await?;
        data.attrs.query_path = query_path(&folder.path);
        data.attrs.path = folder.path;
        Ok(())
    }

    async fn delete<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        client.delete_catalog_item(data.id()?).await?;
        data.clear_id();
        Ok(())
    }
}
