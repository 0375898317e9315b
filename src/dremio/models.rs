//! Dremio v3 wire models
//!
//! Request and response payloads for the catalog, reflection and collaboration
//! endpoints. Field names follow the REST API (camelCase on the wire).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Any catalog entity as returned by lookup by id or by path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntity {
    pub id: String,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// One child of the root catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummaryItem {
    pub id: String,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(rename = "type", default)]
    pub item_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CatalogListing {
    #[serde(default)]
    pub data: Vec<CatalogSummaryItem>,
}

// =============================================================================
// Spaces and folders
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSpaceSpec {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFolderSpec {
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

// =============================================================================
// Sources
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadataPolicy {
    #[serde(rename = "authTTLMs")]
    pub auth_ttl_ms: i64,
    pub dataset_refresh_after_ms: i64,
    pub dataset_expire_after_ms: i64,
    pub names_refresh_ms: i64,
    pub dataset_update_mode: String,
}

/// Source payload; `config` is decoded by `codec::source` according to `source_type`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub config: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_policy: Option<SourceMetadataPolicy>,
    #[serde(default)]
    pub acceleration_refresh_period_ms: i64,
    #[serde(default)]
    pub acceleration_grace_period_ms: i64,
    #[serde(default)]
    pub acceleration_never_expire: bool,
    #[serde(default)]
    pub acceleration_never_refresh: bool,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSourceSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub config: Value,
    pub metadata_policy: SourceMetadataPolicy,
    pub acceleration_refresh_period_ms: i64,
    pub acceleration_grace_period_ms: i64,
    pub acceleration_never_expire: bool,
    pub acceleration_never_refresh: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSourceSpec {
    pub description: String,
    pub config: Value,
    pub metadata_policy: SourceMetadataPolicy,
    pub acceleration_refresh_period_ms: i64,
    pub acceleration_grace_period_ms: i64,
    pub acceleration_never_expire: bool,
    pub acceleration_never_refresh: bool,
}

// =============================================================================
// Datasets
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldType {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetField {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

/// Fields shared by physical and virtual datasets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub fields: Vec<DatasetField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(default)]
    pub field_delimiter: String,
    #[serde(default)]
    pub line_delimiter: String,
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub escape: String,
    #[serde(default)]
    pub skip_first_line: bool,
    #[serde(default)]
    pub extract_header: bool,
    #[serde(default)]
    pub trim_header: bool,
    #[serde(default)]
    pub auto_generate_column_names: bool,
    #[serde(default)]
    pub sheet_name: String,
    #[serde(default)]
    pub has_merged_cells: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetAccelerationRefreshPolicy {
    pub refresh_period_ms: i64,
    pub grace_period_ms: i64,
    pub method: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refresh_field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalDataset {
    #[serde(flatten)]
    pub dataset: Dataset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DatasetFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration_refresh_policy: Option<DatasetAccelerationRefreshPolicy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhysicalDatasetSpec {
    pub path: Vec<String>,
    pub format: DatasetFormat,
    pub acceleration_refresh_policy: DatasetAccelerationRefreshPolicy,
}

/// An empty spec clears both the format override and the refresh policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhysicalDatasetSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DatasetFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration_refresh_policy: Option<DatasetAccelerationRefreshPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualDataset {
    #[serde(flatten)]
    pub dataset: Dataset,
    #[serde(default)]
    pub sql: String,
    #[serde(default)]
    pub sql_context: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVirtualDatasetSpec {
    pub path: Vec<String>,
    pub sql: String,
    pub sql_context: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVirtualDatasetSpec {
    pub sql: String,
    pub sql_context: Vec<String>,
}

// =============================================================================
// Reflections
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionField {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionFieldWithGranularity {
    pub name: String,
    #[serde(default)]
    pub granularity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionMeasureField {
    pub name: String,
    #[serde(default)]
    pub measure_type_list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReflectionSpec {
    pub name: String,
    pub enabled: bool,
    pub display_fields: Vec<ReflectionField>,
    pub distribution_fields: Vec<ReflectionField>,
    pub partition_fields: Vec<ReflectionField>,
    pub sort_fields: Vec<ReflectionField>,
    pub partition_distribution_strategy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReflectionSpec {
    pub name: String,
    pub enabled: bool,
    pub dimension_fields: Vec<ReflectionFieldWithGranularity>,
    pub measure_fields: Vec<ReflectionMeasureField>,
    pub distribution_fields: Vec<ReflectionField>,
    pub partition_fields: Vec<ReflectionField>,
    pub sort_fields: Vec<ReflectionField>,
    pub partition_distribution_strategy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReflection {
    pub id: String,
    #[serde(default)]
    pub dataset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub display_fields: Vec<ReflectionField>,
    #[serde(default)]
    pub distribution_fields: Vec<ReflectionField>,
    #[serde(default)]
    pub partition_fields: Vec<ReflectionField>,
    #[serde(default)]
    pub sort_fields: Vec<ReflectionField>,
    #[serde(default)]
    pub partition_distribution_strategy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReflection {
    pub id: String,
    #[serde(default)]
    pub dataset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub dimension_fields: Vec<ReflectionFieldWithGranularity>,
    #[serde(default)]
    pub measure_fields: Vec<ReflectionMeasureField>,
    #[serde(default)]
    pub distribution_fields: Vec<ReflectionField>,
    #[serde(default)]
    pub partition_fields: Vec<ReflectionField>,
    #[serde(default)]
    pub sort_fields: Vec<ReflectionField>,
    #[serde(default)]
    pub partition_distribution_strategy: String,
}

// =============================================================================
// Collaboration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityTags {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityWiki {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub version: i64,
}
