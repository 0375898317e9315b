//! Resource Registry - the kinds this provider serves
//!
//! Maps host-facing type names to resource and data source kinds, and caches every
//! kind's schema on first access.

use super::catalog::{CatalogDataSource, CatalogResource};
use super::collaboration::{EntityTagsResource, EntityWikiResource};
use super::folder::FolderResource;
use super::lifecycle::{DataSource, Resource};
use super::physical_dataset::PhysicalDatasetResource;
use super::promoted_dataset::PromotedDatasetResource;
use super::reflection::{AggrReflectionResource, RawReflectionResource, SimpleAggrReflectionResource};
use super::schema::Schema;
use super::source::{MssqlSourceResource, NasSourceResource, SourceGenericResource};
use super::space::SpaceResource;
use super::summary::SummaryDataSource;
use super::virtual_dataset::VirtualDatasetResource;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Every managed resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Space,
    Folder,
    Source,
    NasSource,
    MssqlSource,
    PhysicalDataset,
    PromotedDataset,
    VirtualDataset,
    RawReflection,
    AggrReflection,
    SimpleAggrReflection,
    EntityTags,
    EntityWiki,
    Catalog,
}

impl ResourceKind {
    pub const ALL: &'static [ResourceKind] = &[
        Self::Space,
        Self::Folder,
        Self::Source,
        Self::NasSource,
        Self::MssqlSource,
        Self::PhysicalDataset,
        Self::PromotedDataset,
        Self::VirtualDataset,
        Self::RawReflection,
        Self::AggrReflection,
        Self::SimpleAggrReflection,
        Self::EntityTags,
        Self::EntityWiki,
        Self::Catalog,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Space => SpaceResource::TYPE_NAME,
            Self::Folder => FolderResource::TYPE_NAME,
            Self::Source => SourceGenericResource::TYPE_NAME,
            Self::NasSource => NasSourceResource::TYPE_NAME,
            Self::MssqlSource => MssqlSourceResource::TYPE_NAME,
            Self::PhysicalDataset => PhysicalDatasetResource::TYPE_NAME,
            Self::PromotedDataset => PromotedDatasetResource::TYPE_NAME,
            Self::VirtualDataset => VirtualDatasetResource::TYPE_NAME,
            Self::RawReflection => RawReflectionResource::TYPE_NAME,
            Self::AggrReflection => AggrReflectionResource::TYPE_NAME,
            Self::SimpleAggrReflection => SimpleAggrReflectionResource::TYPE_NAME,
            Self::EntityTags => EntityTagsResource::TYPE_NAME,
            Self::EntityWiki => EntityWikiResource::TYPE_NAME,
            Self::Catalog => CatalogResource::TYPE_NAME,
        }
    }

    fn schema(self) -> Schema {
        match self {
            Self::Space => SpaceResource::schema(),
            Self::Folder => FolderResource::schema(),
            Self::Source => SourceGenericResource::schema(),
            Self::NasSource => NasSourceResource::schema(),
            Self::MssqlSource => MssqlSourceResource::schema(),
            Self::PhysicalDataset => PhysicalDatasetResource::schema(),
            Self::PromotedDataset => PromotedDatasetResource::schema(),
            Self::VirtualDataset => VirtualDatasetResource::schema(),
            Self::RawReflection => RawReflectionResource::schema(),
            Self::AggrReflection => AggrReflectionResource::schema(),
            Self::SimpleAggrReflection => SimpleAggrReflectionResource::schema(),
            Self::EntityTags => EntityTagsResource::schema(),
            Self::EntityWiki => EntityWikiResource::schema(),
            Self::Catalog => CatalogResource::schema(),
        }
    }
}

/// Every read-only data source kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSourceKind {
    Catalog,
    Summary,
}

impl DataSourceKind {
    pub const ALL: &'static [DataSourceKind] = &[Self::Catalog, Self::Summary];

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Catalog => CatalogDataSource::TYPE_NAME,
            Self::Summary => SummaryDataSource::TYPE_NAME,
        }
    }

    fn schema(self) -> Schema {
        match self {
            Self::Catalog => CatalogDataSource::schema(),
            Self::Summary => SummaryDataSource::schema(),
        }
    }
}

/// Schemas of every kind, keyed by type name
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchemas {
    pub resources: BTreeMap<&'static str, Schema>,
    pub data_sources: BTreeMap<&'static str, Schema>,
}

/// Global registry built on first access
static REGISTRY: OnceLock<ProviderSchemas> = OnceLock::new();

/// Get the schema registry
pub fn get_registry() -> &'static ProviderSchemas {
    REGISTRY.get_or_init(|| ProviderSchemas {
        resources: ResourceKind::ALL
            .iter()
            .map(|kind| (kind.type_name(), kind.schema()))
            .collect(),
        data_sources: DataSourceKind::ALL
            .iter()
            .map(|kind| (kind.type_name(), kind.schema()))
            .collect(),
    })
}

/// Get a resource kind by type name
pub fn get_resource_kind(type_name: &str) -> Option<ResourceKind> {
    ResourceKind::ALL
        .iter()
        .copied()
        .find(|kind| kind.type_name() == type_name)
}

/// Get a data source kind by type name
pub fn get_data_source_kind(type_name: &str) -> Option<DataSourceKind> {
    DataSourceKind::ALL
        .iter()
        .copied()
        .find(|kind| kind.type_name() == type_name)
}

/// Get a resource schema by type name
pub fn get_resource_schema(type_name: &str) -> Option<&'static Schema> {
    get_registry().resources.get(type_name)
}

/// Get a data source schema by type name
pub fn get_data_source_schema(type_name: &str) -> Option<&'static Schema> {
    get_registry().data_sources.get(type_name)
}

/// Get all resource type names
pub fn get_all_resource_types() -> Vec<&'static str> {
    get_registry().resources.keys().copied().collect()
}
