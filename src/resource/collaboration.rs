//! Tags and wiki attached to a catalog entity
//!
//! Both are versioned documents: every write carries the version last read, and the
//! resource id is the id of the entity they belong to. Deleting writes an empty
//! document rather than removing anything.

use super::lifecycle::{Resource, ResourceData};
use super::schema::{AttrType, Attribute, Schema};
use crate::dremio::DremioApi;
use crate::error::Result;
use serde::{Deserialize, Serialize};

fn entity_schema() -> Schema {
    Schema::new().with("entity_id", Attribute::required(AttrType::String).force_new())
}

// =============================================================================
// Tags
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityTagsAttrs {
    pub entity_id: String,
    pub tags: Vec<String>,
}

pub struct EntityTagsResource;

impl Resource for EntityTagsResource {
    const TYPE_NAME: &'static str = "dremio_entity_tags";

    type Attrs = EntityTagsAttrs;

    fn schema() -> Schema {
        entity_schema().with("tags", Attribute::required(AttrType::string_list()))
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let entity_id = data.attrs.entity_id.clone();
        // Any failed lookup is taken to mean no tags exist yet
        let version = match client.get_entity_tags(&entity_id).await {
            Ok(existing) => existing.version,
            Err(err) => {
                tracing::warn!("No tag version for '{}', writing unversioned: {}", entity_id, err);
                String::new()
            }
        };

        client
            .set_entity_tags(&entity_id, &data.attrs.tags, &version)
            .await?;
        data.set_id(entity_id);
        Self::read(client, data).await
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let tags = client.get_entity_tags(data.id()?).await?;
        data.attrs.tags = tags.tags;
        Ok(())
    }

    async fn update<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let entity_id = data.id()?;
        let current = client.get_entity_tags(entity_id).await?;
        client
            .set_entity_tags(entity_id, &data.attrs.tags, &current.version)
            .await?;
        data.touch();
        Self::read(client, data).await
    }

    async fn delete<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let entity_id = data.id()?;
        // Nothing to clear if the tags cannot be read
        if let Ok(current) = client.get_entity_tags(entity_id).await {
            client
                .set_entity_tags(entity_id, &[], &current.version)
                .await?;
        }
        data.clear_id();
        Ok(())
    }
}

// =============================================================================
// Wiki
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityWikiAttrs {
    pub entity_id: String,
    pub text: String,
}

pub struct EntityWikiResource;

impl Resource for EntityWikiResource {
    const TYPE_NAME: &'static str = "dremio_entity_wiki";

    type Attrs = EntityWikiAttrs;

    fn schema() -> Schema {
        entity_schema().with("text", Attribute::required(AttrType::String))
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let entity_id = data.attrs.entity_id.clone();
        // Any failed lookup is taken to mean no wiki exists yet
        let version = match client.get_entity_wiki(&entity_id).await {
            Ok(existing) => Some(existing.version),
            Err(err) => {
                tracing::warn!("No wiki version for '{}', writing unversioned: {}", entity_id, err);
                None
            }
        };

        client
            .set_entity_wiki(&entity_id, &data.attrs.text, version)
            .await?;
        data.set_id(entity_id);
        Self::read(client, data).await
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let wiki = client.get_entity_wiki(data.id()?).await?;
        data.attrs.text = wiki.text;
        Ok(())
    }

    async fn update<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let entity_id = data.id()?;
        let current = client.get_entity_wiki(entity_id).await?;
        client
            .set_entity_wiki(entity_id, &data.attrs.text, Some(current.version))
            .await?;
        data.touch();
        Self::read(client, data).await
    }

    async fn delete<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let entity_id = data.id()?;
        if let Ok(current) = client.get_entity_wiki(entity_id).await {
            client.set_entity_wiki(entity_id, "", Some(current.version)).await?;
        }
        data.clear_id();
        Ok(())
    }
}
