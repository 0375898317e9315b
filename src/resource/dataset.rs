//! Pieces shared by the dataset resources
//!
//! Schema builders here take a schema and return it extended, so physical, promoted and
//! virtual datasets compose the attributes they need without a shared mutable map.

use super::schema::{AttrType, Attribute, Schema};
use crate::catalog::resolve_absolute_path;
use crate::codec::dataset::{
    AccelerationAttrs, DatasetCommonAttrs, DEFAULT_GRACE_PERIOD_MS, DEFAULT_REFRESH_METHOD,
    DEFAULT_REFRESH_PERIOD_MS,
};
use crate::dremio::models::PhysicalDataset;
use crate::dremio::DremioApi;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Computed `fields`, `path` and `query_path`
pub fn dataset_schema(base: Schema) -> Schema {
    let field = Schema::new()
        .with("name", Attribute::computed(AttrType::String))
        .with("type", Attribute::computed(AttrType::String));

    base.with(
        "fields",
        Attribute::computed(AttrType::list_of(AttrType::Object(field))),
    )
    .with("path", Attribute::computed(AttrType::string_list()))
    .with("query_path", Attribute::computed(AttrType::String))
}

/// Source location plus acceleration refresh policy, on top of [`dataset_schema`]
pub fn physical_dataset_schema(base: Schema) -> Schema {
    let base = base
        .with("source_id", Attribute::required(AttrType::String).force_new())
        .with(
            "relative_path",
            Attribute::required(AttrType::string_list()).force_new(),
        )
        .with(
            "acc_refresh_period_ms",
            Attribute::optional(AttrType::Int).with_default(DEFAULT_REFRESH_PERIOD_MS),
        )
        .with(
            "acc_grace_period_ms",
            Attribute::optional(AttrType::Int).with_default(DEFAULT_GRACE_PERIOD_MS),
        )
        .with(
            "acc_method",
            Attribute::optional(AttrType::String).with_default(DEFAULT_REFRESH_METHOD),
        )
        .with("acc_refresh_field", Attribute::optional(AttrType::String));
    dataset_schema(base)
}

/// Where a physical dataset lives: a source (or folder) id and the path below it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetLocationAttrs {
    pub source_id: String,
    pub relative_path: Vec<String>,
}

impl DatasetLocationAttrs {
    pub async fn resolve<C: DremioApi>(&self, client: &C) -> Result<Vec<String>> {
        resolve_absolute_path(client, &[], &self.source_id, &self.relative_path).await
    }
}

/// Copy the policy and the common fields of a fetched physical dataset
pub fn read_physical_common(
    acceleration: &mut AccelerationAttrs,
    common: &mut DatasetCommonAttrs,
    pds: &PhysicalDataset,
) {
    *acceleration = AccelerationAttrs::from_policy(pds.acceleration_refresh_policy.as_ref());
    *common = DatasetCommonAttrs::from_dataset(&pds.dataset);
}
