//! Dispatch
//!
//! Routes `(type name, operation, state)` from a host to the typed adapter. States cross
//! this boundary as JSON objects; adapter errors come back as diagnostics next to the
//! state as it stood when the operation stopped.

use super::catalog::{CatalogDataSource, CatalogResource};
use super::collaboration::{EntityTagsResource, EntityWikiResource};
use super::folder::FolderResource;
use super::lifecycle::{DataSource, Resource, ResourceData};
use super::physical_dataset::PhysicalDatasetResource;
use super::promoted_dataset::PromotedDatasetResource;
use super::reflection::{AggrReflectionResource, RawReflectionResource, SimpleAggrReflectionResource};
use super::registry::{
    get_data_source_kind, get_registry, get_resource_kind, DataSourceKind, ProviderSchemas,
    ResourceKind,
};
use super::source::{MssqlSourceResource, NasSourceResource, SourceGenericResource};
use super::space::SpaceResource;
use super::summary::SummaryDataSource;
use super::virtual_dataset::VirtualDatasetResource;
use crate::dremio::DremioApi;
use crate::error::{Diagnostic, ProviderError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::Instrument;
use uuid::Uuid;

/// Lifecycle operation requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// New state plus any diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub state: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Response {
    fn ok(state: Value) -> Self {
        Self {
            state,
            diagnostics: Vec::new(),
        }
    }

    fn failed(state: Value, err: ProviderError) -> Self {
        tracing::error!("{}", err);
        Self {
            state,
            diagnostics: vec![Diagnostic::from(err)],
        }
    }

    fn settle<A: Serialize>(data: &ResourceData<A>, result: Result<()>) -> Self {
        match (serde_json::to_value(data), result) {
            (Ok(state), Ok(())) => Self::ok(state),
            (Ok(state), Err(err)) => Self::failed(state, err),
            (Err(err), _) => Self::failed(Value::Null, err.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Remote identity in the returned state, if any
    pub fn id(&self) -> Option<&str> {
        self.state
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }
}

/// Entry point a host drives by type name
pub struct Provider<C> {
    client: C,
}

impl<C: DremioApi> Provider<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn schemas(&self) -> &'static ProviderSchemas {
        get_registry()
    }

    pub async fn create(&self, type_name: &str, config: Value) -> Response {
        self.apply(type_name, Operation::Create, config).await
    }

    pub async fn read(&self, type_name: &str, state: Value) -> Response {
        self.apply(type_name, Operation::Read, state).await
    }

    pub async fn update(&self, type_name: &str, state: Value) -> Response {
        self.apply(type_name, Operation::Update, state).await
    }

    pub async fn delete(&self, type_name: &str, state: Value) -> Response {
        self.apply(type_name, Operation::Delete, state).await
    }

    /// Run one lifecycle operation on a managed resource
    pub async fn apply(&self, type_name: &str, op: Operation, state: Value) -> Response {
        let span = tracing::info_span!(
            "resource",
            type_name,
            op = %op,
            op_id = %Uuid::new_v4()
        );
        let client = &self.client;

        async move {
            let Some(kind) = get_resource_kind(type_name) else {
                return Response::failed(state, unknown_type("resource", type_name));
            };
            match kind {
                ResourceKind::Space => run::<SpaceResource, C>(client, op, state).await,
                ResourceKind::Folder => run::<FolderResource, C>(client, op, state).await,
                ResourceKind::Source => run::<SourceGenericResource, C>(client, op, state).await,
                ResourceKind::NasSource => run::<NasSourceResource, C>(client, op, state).await,
                ResourceKind::MssqlSource => {
                    run::<MssqlSourceResource, C>(client, op, state).await
                }
                ResourceKind::PhysicalDataset => {
                    run::<PhysicalDatasetResource, C>(client, op, state).await
                }
                ResourceKind::PromotedDataset => {
                    run::<PromotedDatasetResource, C>(client, op, state).await
                }
                ResourceKind::VirtualDataset => {
                    run::<VirtualDatasetResource, C>(client, op, state).await
                }
                ResourceKind::RawReflection => {
                    run::<RawReflectionResource, C>(client, op, state).await
                }
                ResourceKind::AggrReflection => {
                    run::<AggrReflectionResource, C>(client, op, state).await
                }
                ResourceKind::SimpleAggrReflection => {
                    run::<SimpleAggrReflectionResource, C>(client, op, state).await
                }
                ResourceKind::EntityTags => run::<EntityTagsResource, C>(client, op, state).await,
                ResourceKind::EntityWiki => run::<EntityWikiResource, C>(client, op, state).await,
                ResourceKind::Catalog => run::<CatalogResource, C>(client, op, state).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Read a data source
    pub async fn read_data_source(&self, type_name: &str, config: Value) -> Response {
        let span = tracing::info_span!(
            "data_source",
            type_name,
            op_id = %Uuid::new_v4()
        );
        let client = &self.client;

        async move {
            let Some(kind) = get_data_source_kind(type_name) else {
                return Response::failed(config, unknown_type("data source", type_name));
            };
            match kind {
                DataSourceKind::Catalog => read_source::<CatalogDataSource, C>(client, config).await,
                DataSourceKind::Summary => read_source::<SummaryDataSource, C>(client, config).await,
            }
        }
        .instrument(span)
        .await
    }
}

fn unknown_type(what: &str, type_name: &str) -> ProviderError {
    ProviderError::invalid(format!("unknown {what} type '{type_name}'"))
}

fn decode_state<A: serde::de::DeserializeOwned>(
    type_name: &str,
    state: &Value,
) -> Result<ResourceData<A>> {
    ResourceData::<A>::deserialize(state)
        .map_err(|e| ProviderError::invalid(format!("malformed {type_name} state: {e}")))
}

async fn run<R: Resource, C: DremioApi>(client: &C, op: Operation, state: Value) -> Response {
    tracing::info!("{} {}", op, R::TYPE_NAME);

    if op == Operation::Update && !R::supports_update() {
        let err = ProviderError::invalid(format!("{} does not support in-place update", R::TYPE_NAME));
        return Response::failed(state, err);
    }
    if matches!(op, Operation::Create | Operation::Update) {
        if let Err(err) = R::schema().validate(&state) {
            return Response::failed(state, err);
        }
    }

    let mut data: ResourceData<R::Attrs> = match decode_state(R::TYPE_NAME, &state) {
        Ok(data) => data,
        Err(err) => return Response::failed(state, err),
    };
    if op == Operation::Create {
        data.clear_id();
    }

    let result = match op {
        Operation::Create => R::create(client, &mut data).await,
        Operation::Read => match R::read(client, &mut data).await {
            Err(err) if err.is_not_found() => {
                tracing::warn!("{} no longer exists, removing from state: {}", R::TYPE_NAME, err);
                data.clear_id();
                Ok(())
            }
            other => other,
        },
        Operation::Update => R::update(client, &mut data).await,
        Operation::Delete => R::delete(client, &mut data).await,
    };

    Response::settle(&data, result)
}

async fn read_source<D: DataSource, C: DremioApi>(client: &C, config: Value) -> Response {
    tracing::info!("read {}", D::TYPE_NAME);

    if let Err(err) = D::schema().validate(&config) {
        return Response::failed(config, err);
    }
    let mut data: ResourceData<D::Attrs> = match decode_state(D::TYPE_NAME, &config) {
        Ok(data) => data,
        Err(err) => return Response::failed(config, err),
    };

    let result = D::read(client, &mut data).await;
    Response::settle(&data, result)
}
