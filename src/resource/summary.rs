//! `dremio_summary`: the top-level entries of the catalog

use super::lifecycle::{DataSource, ResourceData};
use super::schema::{AttrType, Attribute, Schema};
use crate::dremio::DremioApi;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryAttrs {
    pub summary: Vec<SummaryItem>,
}

pub struct SummaryDataSource;

impl DataSource for SummaryDataSource {
    const TYPE_NAME: &'static str = "dremio_summary";

    type Attrs = SummaryAttrs;

    fn schema() -> Schema {
        let item = Schema::new()
            .with("id", Attribute::computed(AttrType::String))
            .with("type", Attribute::computed(AttrType::String));
        Schema::new().with(
            "summary",
            Attribute::computed(AttrType::list_of(AttrType::Object(item))),
        )
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let items = client.get_root_catalog_summary().await?;
        data.attrs.summary = items
            .into_iter()
            .map(|item| SummaryItem {
                id: item.id,
                item_type: item.item_type,
            })
            .collect();
        // New id on every read
        data.set_id(chrono::Utc::now().timestamp().to_string());
        Ok(())
    }
}
