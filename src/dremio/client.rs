//! Dremio Client
//!
//! REST implementation of [`DremioApi`], combining authentication and HTTP
//! functionality.

use super::api::DremioApi;
use super::auth::{Credentials, DremioCredentials};
use super::http::DremioHttpClient;
use super::models::*;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Main Dremio client
#[derive(Clone)]
pub struct DremioClient {
    pub credentials: DremioCredentials,
    pub http: DremioHttpClient,
    pub base_url: String,
}

impl DremioClient {
    /// Create a new client for the server at `base_url`
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = DremioHttpClient::new()?;

        Ok(Self {
            credentials: DremioCredentials::new(credentials, &base_url),
            http,
            base_url,
        })
    }

    async fn authorization(&self) -> Result<String> {
        self.credentials.authorization(&self.http).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let auth = self.authorization().await?;
        let value = self.http.get(url, &auth).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn post_json<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T> {
        let auth = self.authorization().await?;
        let value = self.http.post(url, &auth, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn put_json<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T> {
        let auth = self.authorization().await?;
        let value = self.http.put(url, &auth, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn delete_url(&self, url: &str) -> Result<()> {
        let auth = self.authorization().await?;
        self.http.delete(url, &auth).await?;
        Ok(())
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build a v3 API URL
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/v3/{}", self.base_url, path)
    }

    /// Catalog collection URL
    pub fn catalog_url(&self) -> String {
        self.api_url("catalog")
    }

    /// Catalog entity URL; ids of unpromoted files contain slashes and colons
    pub fn catalog_entity_url(&self, id: &str) -> String {
        self.api_url(&format!("catalog/{}", urlencoding::encode(id)))
    }

    /// Lookup-by-path URL, one encoded segment per path element
    pub fn catalog_by_path_url(&self, path: &[String]) -> String {
        let segments: Vec<String> = path
            .iter()
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        self.api_url(&format!("catalog/by-path/{}", segments.join("/")))
    }

    /// Collaboration sub-resource URL (`tag` or `wiki`)
    pub fn collaboration_url(&self, entity_id: &str, kind: &str) -> String {
        format!("{}/collaboration/{}", self.catalog_entity_url(entity_id), kind)
    }

    /// Reflection URL; `None` for the collection
    pub fn reflection_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => self.api_url(&format!("reflection/{}", urlencoding::encode(id))),
            None => self.api_url("reflection"),
        }
    }
}

/// Serialize `spec` and overlay `extra` object keys on top of it
fn with_fields<S: Serialize>(spec: &S, extra: Value) -> Result<Value> {
    let mut body = match serde_json::to_value(spec)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Value::Object(extra) = extra {
        body.extend(extra);
    }
    Ok(Value::Object(body))
}

impl DremioApi for DremioClient {
    async fn get_catalog_entity_by_id(&self, id: &str) -> Result<CatalogEntity> {
        self.get_json(&self.catalog_entity_url(id)).await
    }

    async fn get_catalog_entity_by_path(&self, path: &[String]) -> Result<CatalogEntity> {
        self.get_json(&self.catalog_by_path_url(path)).await
    }

    async fn get_root_catalog_summary(&self) -> Result<Vec<CatalogSummaryItem>> {
        let listing: CatalogListing = self.get_json(&self.catalog_url()).await?;
        Ok(listing.data)
    }

    async fn delete_catalog_item(&self, id: &str) -> Result<()> {
        self.delete_url(&self.catalog_entity_url(id)).await
    }

    async fn new_space(&self, spec: &NewSpaceSpec) -> Result<Space> {
        let body = with_fields(spec, json!({ "entityType": "space" }))?;
        self.post_json(&self.catalog_url(), &body).await
    }

    async fn get_space(&self, id: &str) -> Result<Space> {
        self.get_json(&self.catalog_entity_url(id)).await
    }

    async fn new_folder(&self, spec: &NewFolderSpec) -> Result<Folder> {
        let body = with_fields(spec, json!({ "entityType": "folder" }))?;
        self.post_json(&self.catalog_url(), &body).await
    }

    async fn get_folder(&self, id: &str) -> Result<Folder> {
        self.get_json(&self.catalog_entity_url(id)).await
    }

    async fn new_source(&self, spec: &NewSourceSpec) -> Result<Source> {
        let body = with_fields(spec, json!({ "entityType": "source" }))?;
        self.post_json(&self.catalog_url(), &body).await
    }

    async fn get_source(&self, id: &str) -> Result<Source> {
        self.get_json(&self.catalog_entity_url(id)).await
    }

    async fn update_source(&self, id: &str, spec: &UpdateSourceSpec) -> Result<Source> {
        let current = self.get_source(id).await?;
        let body = with_fields(
            spec,
            json!({
                "entityType": "source",
                "id": current.id,
                "tag": current.tag,
                "name": current.name,
                "type": current.source_type,
            }),
        )?;
        self.put_json(&self.catalog_entity_url(id), &body).await
    }

    async fn new_physical_dataset(
        &self,
        id: &str,
        spec: &NewPhysicalDatasetSpec,
    ) -> Result<PhysicalDataset> {
        let body = with_fields(
            spec,
            json!({ "entityType": "dataset", "type": "PHYSICAL_DATASET", "id": id }),
        )?;
        self.post_json(&self.catalog_entity_url(id), &body).await
    }

    async fn get_physical_dataset(&self, id: &str) -> Result<PhysicalDataset> {
        self.get_json(&self.catalog_entity_url(id)).await
    }

    async fn update_physical_dataset(
        &self,
        id: &str,
        spec: &UpdatePhysicalDatasetSpec,
    ) -> Result<PhysicalDataset> {
        let current = self.get_physical_dataset(id).await?;
        let body = with_fields(
            spec,
            json!({
                "entityType": "dataset",
                "type": "PHYSICAL_DATASET",
                "id": current.dataset.id,
                "path": current.dataset.path,
                "tag": current.dataset.tag,
            }),
        )?;
        self.put_json(&self.catalog_entity_url(id), &body).await
    }

    async fn new_virtual_dataset(&self, spec: &NewVirtualDatasetSpec) -> Result<VirtualDataset> {
        let body = with_fields(
            spec,
            json!({ "entityType": "dataset", "type": "VIRTUAL_DATASET" }),
        )?;
        self.post_json(&self.catalog_url(), &body).await
    }

    async fn get_virtual_dataset(&self, id: &str) -> Result<VirtualDataset> {
        self.get_json(&self.catalog_entity_url(id)).await
    }

    async fn update_virtual_dataset(
        &self,
        id: &str,
        spec: &UpdateVirtualDatasetSpec,
    ) -> Result<VirtualDataset> {
        let current = self.get_virtual_dataset(id).await?;
        let body = with_fields(
            spec,
            json!({
                "entityType": "dataset",
                "type": "VIRTUAL_DATASET",
                "id": current.dataset.id,
                "path": current.dataset.path,
                "tag": current.dataset.tag,
            }),
        )?;
        self.put_json(&self.catalog_entity_url(id), &body).await
    }

    async fn new_raw_reflection(
        &self,
        dataset_id: &str,
        spec: &RawReflectionSpec,
    ) -> Result<RawReflection> {
        let body = with_fields(spec, json!({ "type": "RAW", "datasetId": dataset_id }))?;
        self.post_json(&self.reflection_url(None), &body).await
    }

    async fn get_raw_reflection(&self, id: &str) -> Result<RawReflection> {
        self.get_json(&self.reflection_url(Some(id))).await
    }

    async fn update_raw_reflection(
        &self,
        id: &str,
        spec: &RawReflectionSpec,
    ) -> Result<RawReflection> {
        let current = self.get_raw_reflection(id).await?;
        let body = with_fields(
            spec,
            json!({
                "type": "RAW",
                "id": current.id,
                "tag": current.tag,
                "datasetId": current.dataset_id,
            }),
        )?;
        self.put_json(&self.reflection_url(Some(id)), &body).await
    }

    async fn new_aggregation_reflection(
        &self,
        dataset_id: &str,
        spec: &AggregationReflectionSpec,
    ) -> Result<AggregationReflection> {
        let body = with_fields(
            spec,
            json!({ "type": "AGGREGATION", "datasetId": dataset_id }),
        )?;
        self.post_json(&self.reflection_url(None), &body).await
    }

    async fn get_aggregation_reflection(&self, id: &str) -> Result<AggregationReflection> {
        self.get_json(&self.reflection_url(Some(id))).await
    }

    async fn update_aggregation_reflection(
        &self,
        id: &str,
        spec: &AggregationReflectionSpec,
    ) -> Result<AggregationReflection> {
        let current = self.get_aggregation_reflection(id).await?;
        let body = with_fields(
            spec,
            json!({
                "type": "AGGREGATION",
                "id": current.id,
                "tag": current.tag,
                "datasetId": current.dataset_id,
            }),
        )?;
        self.put_json(&self.reflection_url(Some(id)), &body).await
    }

    async fn delete_reflection(&self, id: &str) -> Result<()> {
        self.delete_url(&self.reflection_url(Some(id))).await
    }

    async fn get_entity_tags(&self, entity_id: &str) -> Result<EntityTags> {
        self.get_json(&self.collaboration_url(entity_id, "tag")).await
    }

    async fn set_entity_tags(&self, entity_id: &str, tags: &[String], version: &str) -> Result<()> {
        let mut body = json!({ "tags": tags });
        // First write on an entity carries no version
        if !version.is_empty() {
            body["version"] = json!(version);
        }
        let auth = self.authorization().await?;
        self.http
            .post(&self.collaboration_url(entity_id, "tag"), &auth, &body)
            .await?;
        Ok(())
    }

    async fn get_entity_wiki(&self, entity_id: &str) -> Result<EntityWiki> {
        self.get_json(&self.collaboration_url(entity_id, "wiki")).await
    }

    async fn set_entity_wiki(
        &self,
        entity_id: &str,
        text: &str,
        version: Option<i64>,
    ) -> Result<()> {
        let mut body = json!({ "text": text });
        if let Some(version) = version {
            body["version"] = json!(version);
        }
        let auth = self.authorization().await?;
        self.http
            .post(&self.collaboration_url(entity_id, "wiki"), &auth, &body)
            .await?;
        Ok(())
    }
}
