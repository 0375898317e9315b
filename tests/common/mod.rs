//! In-memory Dremio used by the lifecycle tests
//!
//! Keeps one map per entity family, records every call by name and lets a test make
//! selected calls fail.

#![allow(dead_code)]

use dremio_provider::dremio::models::*;
use dremio_provider::dremio::DremioApi;
use dremio_provider::error::{ProviderError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct State {
    pub catalog: HashMap<String, CatalogEntity>,
    pub spaces: HashMap<String, Space>,
    pub folders: HashMap<String, Folder>,
    pub sources: HashMap<String, Source>,
    pub physical: HashMap<String, PhysicalDataset>,
    pub virtuals: HashMap<String, VirtualDataset>,
    pub raw: HashMap<String, RawReflection>,
    pub aggregations: HashMap<String, AggregationReflection>,
    pub tags: HashMap<String, EntityTags>,
    pub wikis: HashMap<String, EntityWiki>,
    pub calls: Vec<String>,
    pub tag_writes: Vec<(String, Vec<String>, String)>,
    pub wiki_writes: Vec<(String, String, Option<i64>)>,
    pub source_updates: Vec<UpdateSourceSpec>,
    pub dataset_updates: Vec<UpdatePhysicalDatasetSpec>,
    pub failing: HashMap<&'static str, u32>,
    pub interleaved: HashSet<&'static str>,
}

#[derive(Default)]
pub struct FakeDremio {
    pub state: Mutex<State>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn missing(id: &str) -> ProviderError {
    ProviderError::NotFound(format!("Could not find entity with key [{id}]"))
}

impl FakeDremio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call to `method` fail with a transport error
    pub fn fail_next(&self, method: &'static str) {
        *self.state.lock().unwrap().failing.entry(method).or_default() += 1;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Let another client write right after the next `method` read, so the version
    /// that read returned is stale
    pub fn write_after_next(&self, method: &'static str) {
        self.state.lock().unwrap().interleaved.insert(method);
    }

    pub fn count_calls(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| *c == method)
            .count()
    }

    /// Register a catalog entity, e.g. an unpromoted file
    pub fn add_entity(&self, id: &str, path: &[&str], entity_type: &str) {
        let entity = CatalogEntity {
            id: id.to_string(),
            path: path.iter().map(|s| s.to_string()).collect(),
            entity_type: entity_type.to_string(),
            tag: None,
        };
        self.state
            .lock()
            .unwrap()
            .catalog
            .insert(id.to_string(), entity);
    }

    pub fn add_physical_dataset(&self, id: &str, path: &[&str]) {
        self.add_entity(id, path, "dataset");
        let pds = PhysicalDataset {
            dataset: Dataset {
                id: id.to_string(),
                path: path.iter().map(|s| s.to_string()).collect(),
                fields: vec![DatasetField {
                    name: "ts".to_string(),
                    field_type: FieldType {
                        name: "TIMESTAMP".to_string(),
                    },
                }],
                tag: Some("1".to_string()),
            },
            format: None,
            acceleration_refresh_policy: None,
        };
        self.state
            .lock()
            .unwrap()
            .physical
            .insert(id.to_string(), pds);
    }

    fn enter(&self, method: &'static str) -> Result<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(method.to_string());
        if let Some(remaining) = state.failing.get_mut(method).filter(|n| **n > 0) {
            *remaining -= 1;
            return Err(ProviderError::from_status(500, format!("{method} failed")));
        }
        Ok(state)
    }
}

fn register(state: &mut State, id: &str, path: &[String], entity_type: &str) {
    state.catalog.insert(
        id.to_string(),
        CatalogEntity {
            id: id.to_string(),
            path: path.to_vec(),
            entity_type: entity_type.to_string(),
            tag: None,
        },
    );
}

impl DremioApi for FakeDremio {
    async fn get_catalog_entity_by_id(&self, id: &str) -> Result<CatalogEntity> {
        let state = self.enter("get_catalog_entity_by_id")?;
        state.catalog.get(id).cloned().ok_or_else(|| missing(id))
    }

    async fn get_catalog_entity_by_path(&self, path: &[String]) -> Result<CatalogEntity> {
        let state = self.enter("get_catalog_entity_by_path")?;
        state
            .catalog
            .values()
            .find(|entity| entity.path == path)
            .cloned()
            .ok_or_else(|| missing(&path.join("/")))
    }

    async fn get_root_catalog_summary(&self) -> Result<Vec<CatalogSummaryItem>> {
        let state = self.enter("get_root_catalog_summary")?;
        let mut items: Vec<CatalogSummaryItem> = state
            .catalog
            .values()
            .filter(|entity| entity.path.len() == 1)
            .map(|entity| CatalogSummaryItem {
                id: entity.id.clone(),
                path: entity.path.clone(),
                item_type: "CONTAINER".to_string(),
            })
            .collect();
        items.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(items)
    }

    async fn delete_catalog_item(&self, id: &str) -> Result<()> {
        let mut state = self.enter("delete_catalog_item")?;
        if state.catalog.remove(id).is_none() {
            return Err(missing(id));
        }
        state.spaces.remove(id);
        state.folders.remove(id);
        state.sources.remove(id);
        state.physical.remove(id);
        state.virtuals.remove(id);
        Ok(())
    }

    async fn new_space(&self, spec: &NewSpaceSpec) -> Result<Space> {
        let mut state = self.enter("new_space")?;
        let space = Space {
            id: new_id(),
            name: spec.name.clone(),
            tag: Some("0".to_string()),
        };
        register(&mut state, &space.id, &[spec.name.clone()], "space");
        state.spaces.insert(space.id.clone(), space.clone());
        Ok(space)
    }

    async fn get_space(&self, id: &str) -> Result<Space> {
        let state = self.enter("get_space")?;
        state.spaces.get(id).cloned().ok_or_else(|| missing(id))
    }

    async fn new_folder(&self, spec: &NewFolderSpec) -> Result<Folder> {
        let mut state = self.enter("new_folder")?;
        let folder = Folder {
            id: new_id(),
            path: spec.path.clone(),
            tag: Some("0".to_string()),
        };
        register(&mut state, &folder.id, &spec.path, "folder");
        state.folders.insert(folder.id.clone(), folder.clone());
        Ok(folder)
    }

    async fn get_folder(&self, id: &str) -> Result<Folder> {
        let state = self.enter("get_folder")?;
        state.folders.get(id).cloned().ok_or_else(|| missing(id))
    }

    async fn new_source(&self, spec: &NewSourceSpec) -> Result<Source> {
        let mut state = self.enter("new_source")?;
        let source = Source {
            id: new_id(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            source_type: spec.source_type.clone(),
            config: spec.config.clone(),
            metadata_policy: Some(spec.metadata_policy.clone()),
            acceleration_refresh_period_ms: spec.acceleration_refresh_period_ms,
            acceleration_grace_period_ms: spec.acceleration_grace_period_ms,
            acceleration_never_expire: spec.acceleration_never_expire,
            acceleration_never_refresh: spec.acceleration_never_refresh,
            path: vec![spec.name.clone()],
            tag: Some("0".to_string()),
        };
        register(&mut state, &source.id, &source.path, "source");
        state.sources.insert(source.id.clone(), source.clone());
        Ok(source)
    }

    async fn get_source(&self, id: &str) -> Result<Source> {
        let state = self.enter("get_source")?;
        let mut source = state.sources.get(id).cloned().ok_or_else(|| missing(id))?;
        // Secrets are never returned
        if let Some(config) = source.config.as_object_mut() {
            config.remove("password");
        }
        Ok(source)
    }

    async fn update_source(&self, id: &str, spec: &UpdateSourceSpec) -> Result<Source> {
        let mut state = self.enter("update_source")?;
        state.source_updates.push(spec.clone());
        let source = state.sources.get_mut(id).ok_or_else(|| missing(id))?;
        source.description = spec.description.clone();
        source.config = spec.config.clone();
        source.metadata_policy = Some(spec.metadata_policy.clone());
        source.acceleration_refresh_period_ms = spec.acceleration_refresh_period_ms;
        source.acceleration_grace_period_ms = spec.acceleration_grace_period_ms;
        source.acceleration_never_expire = spec.acceleration_never_expire;
        source.acceleration_never_refresh = spec.acceleration_never_refresh;
        Ok(source.clone())
    }

    async fn new_physical_dataset(
        &self,
        id: &str,
        spec: &NewPhysicalDatasetSpec,
    ) -> Result<PhysicalDataset> {
        let mut state = self.enter("new_physical_dataset")?;
        if !state.catalog.contains_key(id) {
            return Err(missing(id));
        }
        // Promotion replaces the file id with a dataset id
        state.catalog.remove(id);
        let pds = PhysicalDataset {
            dataset: Dataset {
                id: new_id(),
                path: spec.path.clone(),
                fields: Vec::new(),
                tag: Some("0".to_string()),
            },
            format: Some(spec.format.clone()),
            acceleration_refresh_policy: Some(spec.acceleration_refresh_policy.clone()),
        };
        register(&mut state, &pds.dataset.id, &spec.path, "dataset");
        state.physical.insert(pds.dataset.id.clone(), pds.clone());
        Ok(pds)
    }

    async fn get_physical_dataset(&self, id: &str) -> Result<PhysicalDataset> {
        let state = self.enter("get_physical_dataset")?;
        state.physical.get(id).cloned().ok_or_else(|| missing(id))
    }

    async fn update_physical_dataset(
        &self,
        id: &str,
        spec: &UpdatePhysicalDatasetSpec,
    ) -> Result<PhysicalDataset> {
        let mut state = self.enter("update_physical_dataset")?;
        state.dataset_updates.push(spec.clone());
        let pds = state.physical.get_mut(id).ok_or_else(|| missing(id))?;
        pds.format = spec.format.clone();
        pds.acceleration_refresh_policy = spec.acceleration_refresh_policy.clone();
        Ok(pds.clone())
    }

    async fn new_virtual_dataset(&self, spec: &NewVirtualDatasetSpec) -> Result<VirtualDataset> {
        let mut state = self.enter("new_virtual_dataset")?;
        let vds = VirtualDataset {
            dataset: Dataset {
                id: new_id(),
                path: spec.path.clone(),
                fields: Vec::new(),
                tag: Some("0".to_string()),
            },
            sql: spec.sql.clone(),
            sql_context: spec.sql_context.clone(),
        };
        register(&mut state, &vds.dataset.id, &spec.path, "dataset");
        state.virtuals.insert(vds.dataset.id.clone(), vds.clone());
        Ok(vds)
    }

    async fn get_virtual_dataset(&self, id: &str) -> Result<VirtualDataset> {
        let state = self.enter("get_virtual_dataset")?;
        state.virtuals.get(id).cloned().ok_or_else(|| missing(id))
    }

    async fn update_virtual_dataset(
        &self,
        id: &str,
        spec: &UpdateVirtualDatasetSpec,
    ) -> Result<VirtualDataset> {
        let mut state = self.enter("update_virtual_dataset")?;
        let vds = state.virtuals.get_mut(id).ok_or_else(|| missing(id))?;
        vds.sql = spec.sql.clone();
        vds.sql_context = spec.sql_context.clone();
        Ok(vds.clone())
    }

    async fn new_raw_reflection(
        &self,
        dataset_id: &str,
        spec: &RawReflectionSpec,
    ) -> Result<RawReflection> {
        let mut state = self.enter("new_raw_reflection")?;
        let reflection = RawReflection {
            id: new_id(),
            dataset_id: dataset_id.to_string(),
            tag: Some("0".to_string()),
            name: spec.name.clone(),
            enabled: spec.enabled,
            display_fields: spec.display_fields.clone(),
            distribution_fields: spec.distribution_fields.clone(),
            partition_fields: spec.partition_fields.clone(),
            sort_fields: spec.sort_fields.clone(),
            partition_distribution_strategy: spec.partition_distribution_strategy.clone(),
        };
        state.raw.insert(reflection.id.clone(), reflection.clone());
        Ok(reflection)
    }

    async fn get_raw_reflection(&self, id: &str) -> Result<RawReflection> {
        let state = self.enter("get_raw_reflection")?;
        state.raw.get(id).cloned().ok_or_else(|| missing(id))
    }

    async fn update_raw_reflection(
        &self,
        id: &str,
        spec: &RawReflectionSpec,
    ) -> Result<RawReflection> {
        let mut state = self.enter("update_raw_reflection")?;
        let reflection = state.raw.get_mut(id).ok_or_else(|| missing(id))?;
        reflection.name = spec.name.clone();
        reflection.enabled = spec.enabled;
        reflection.display_fields = spec.display_fields.clone();
        reflection.distribution_fields = spec.distribution_fields.clone();
        reflection.partition_fields = spec.partition_fields.clone();
        reflection.sort_fields = spec.sort_fields.clone();
        reflection.partition_distribution_strategy = spec.partition_distribution_strategy.clone();
        Ok(reflection.clone())
    }

    async fn new_aggregation_reflection(
        &self,
        dataset_id: &str,
        spec: &AggregationReflectionSpec,
    ) -> Result<AggregationReflection> {
        let mut state = self.enter("new_aggregation_reflection")?;
        let reflection = AggregationReflection {
            id: new_id(),
            dataset_id: dataset_id.to_string(),
            tag: Some("0".to_string()),
            name: spec.name.clone(),
            enabled: spec.enabled,
            dimension_fields: spec.dimension_fields.clone(),
            measure_fields: spec.measure_fields.clone(),
            distribution_fields: spec.distribution_fields.clone(),
            partition_fields: spec.partition_fields.clone(),
            sort_fields: spec.sort_fields.clone(),
            partition_distribution_strategy: spec.partition_distribution_strategy.clone(),
        };
        state
            .aggregations
            .insert(reflection.id.clone(), reflection.clone());
        Ok(reflection)
    }

    async fn get_aggregation_reflection(&self, id: &str) -> Result<AggregationReflection> {
        let state = self.enter("get_aggregation_reflection")?;
        state.aggregations.get(id).cloned().ok_or_else(|| missing(id))
    }

    async fn update_aggregation_reflection(
        &self,
        id: &str,
        spec: &AggregationReflectionSpec,
    ) -> Result<AggregationReflection> {
        let mut state = self.enter("update_aggregation_reflection")?;
        let reflection = state.aggregations.get_mut(id).ok_or_else(|| missing(id))?;
        reflection.name = spec.name.clone();
        reflection.enabled = spec.enabled;
        reflection.dimension_fields = spec.dimension_fields.clone();
        reflection.measure_fields = spec.measure_fields.clone();
        Ok(reflection.clone())
    }

    async fn delete_reflection(&self, id: &str) -> Result<()> {
        let mut state = self.enter("delete_reflection")?;
        let removed = state.raw.remove(id).is_some() | state.aggregations.remove(id).is_some();
        if removed {
            Ok(())
        } else {
            Err(missing(id))
        }
    }

    async fn get_entity_tags(&self, entity_id: &str) -> Result<EntityTags> {
        let mut state = self.enter("get_entity_tags")?;
        let tags = state
            .tags
            .get(entity_id)
            .cloned()
            .ok_or_else(|| missing(entity_id))?;
        if state.interleaved.remove("get_entity_tags") {
            if let Some(stored) = state.tags.get_mut(entity_id) {
                stored.version = next_tag_version(&stored.version);
            }
        }
        Ok(tags)
    }

    async fn set_entity_tags(&self, entity_id: &str, tags: &[String], version: &str) -> Result<()> {
        let mut state = self.enter("set_entity_tags")?;
        state
            .tag_writes
            .push((entity_id.to_string(), tags.to_vec(), version.to_string()));
        let stored = state
            .tags
            .get(entity_id)
            .map(|t| t.version.clone())
            .unwrap_or_default();
        if stored != version {
            return Err(ProviderError::from_status(
                409,
                format!("tag version '{version}' does not match '{stored}'"),
            ));
        }
        state.tags.insert(
            entity_id.to_string(),
            EntityTags {
                tags: tags.to_vec(),
                version: next_tag_version(&stored),
            },
        );
        Ok(())
    }

    async fn get_entity_wiki(&self, entity_id: &str) -> Result<EntityWiki> {
        let mut state = self.enter("get_entity_wiki")?;
        let wiki = state
            .wikis
            .get(entity_id)
            .cloned()
            .ok_or_else(|| missing(entity_id))?;
        if state.interleaved.remove("get_entity_wiki") {
            if let Some(stored) = state.wikis.get_mut(entity_id) {
                stored.version += 1;
            }
        }
        Ok(wiki)
    }

    async fn set_entity_wiki(
        &self,
        entity_id: &str,
        text: &str,
        version: Option<i64>,
    ) -> Result<()> {
        let mut state = self.enter("set_entity_wiki")?;
        state
            .wiki_writes
            .push((entity_id.to_string(), text.to_string(), version));
        let stored = state.wikis.get(entity_id).map(|w| w.version);
        if stored != version {
            return Err(ProviderError::from_status(
                409,
                format!("wiki version {version:?} does not match {stored:?}"),
            ));
        }
        state.wikis.insert(
            entity_id.to_string(),
            EntityWiki {
                text: text.to_string(),
                version: stored.map_or(0, |v| v + 1),
            },
        );
        Ok(())
    }
}

fn next_tag_version(version: &str) -> String {
    (version.parse::<u64>().unwrap_or(0) + 1).to_string()
}
