//! Dremio API surface consumed by the resource adapters
//!
//! [`DremioClient`](super::client::DremioClient) implements this over REST. Tests
//! implement it in memory.

use super::models::*;
use crate::error::Result;

/// One method per remote call; each is a single request/response
#[allow(async_fn_in_trait)]
pub trait DremioApi {
    // Catalog
    async fn get_catalog_entity_by_id(&self, id: &str) -> Result<CatalogEntity>;
    async fn get_catalog_entity_by_path(&self, path: &[String]) -> Result<CatalogEntity>;
    async fn get_root_catalog_summary(&self) -> Result<Vec<CatalogSummaryItem>>;
    async fn delete_catalog_item(&self, id: &str) -> Result<()>;

    // Spaces and folders
    async fn new_space(&self, spec: &NewSpaceSpec) -> Result<Space>;
    async fn get_space(&self, id: &str) -> Result<Space>;
    async fn new_folder(&self, spec: &NewFolderSpec) -> Result<Folder>;
    async fn get_folder(&self, id: &str) -> Result<Folder>;

    // Sources
    async fn new_source(&self, spec: &NewSourceSpec) -> Result<Source>;
    async fn get_source(&self, id: &str) -> Result<Source>;
    async fn update_source(&self, id: &str, spec: &UpdateSourceSpec) -> Result<Source>;

    // Datasets
    async fn new_physical_dataset(
        &self,
        id: &str,
        spec: &NewPhysicalDatasetSpec,
    ) -> Result<PhysicalDataset>;
    async fn get_physical_dataset(&self, id: &str) -> Result<PhysicalDataset>;
    async fn update_physical_dataset(
        &self,
        id: &str,
        spec: &UpdatePhysicalDatasetSpec,
    ) -> Result<PhysicalDataset>;
    async fn new_virtual_dataset(&self, spec: &NewVirtualDatasetSpec) -> Result<VirtualDataset>;
    async fn get_virtual_dataset(&self, id: &str) -> Result<VirtualDataset>;
    async fn update_virtual_dataset(
        &self,
        id: &str,
        spec: &UpdateVirtualDatasetSpec,
    ) -> Result<VirtualDataset>;

    // Reflections
    async fn new_raw_reflection(
        &self,
        dataset_id: &str,
        spec: &RawReflectionSpec,
    ) -> Result<RawReflection>;
    async fn get_raw_reflection(&self, id: &str) -> Result<RawReflection>;
    async fn update_raw_reflection(
        &self,
        id: &str,
        spec: &RawReflectionSpec,
    ) -> Result<RawReflection>;
    async fn new_aggregation_reflection(
        &self,
        dataset_id: &str,
        spec: &AggregationReflectionSpec,
    ) -> Result<AggregationReflection>;
    async fn get_aggregation_reflection(&self, id: &str) -> Result<AggregationReflection>;
    async fn update_aggregation_reflection(
        &self,
        id: &str,
        spec: &AggregationReflectionSpec,
    ) -> Result<AggregationReflection>;
    async fn delete_reflection(&self, id: &str) -> Result<()>;

    // Collaboration
    async fn get_entity_tags(&self, entity_id: &str) -> Result<EntityTags>;
    async fn set_entity_tags(&self, entity_id: &str, tags: &[String], version: &str)
        -> Result<()>;
    async fn get_entity_wiki(&self, entity_id: &str) -> Result<EntityWiki>;
    /// `None` writes the first version of a wiki
    async fn set_entity_wiki(&self, entity_id: &str, text: &str, version: Option<i64>)
        -> Result<()>;
}
