//! Source resources
//!
//! `dremio_source` takes a `type` plus a generic `config` block; `dremio_source_nas` and
//! `dremio_source_mssql` pin the type and flatten its options into top-level attributes.
//! All three share one lifecycle, parameterized by a [`SourceVariant`].

use super::lifecycle::{Resource, ResourceData};
use super::schema::{AttrType, Attribute, Schema};
use crate::codec::source::{
    MetadataPolicyAttrs, MssqlConfig, NasConfig, SecureConfigBlock, SourceAccelerationAttrs,
    SourceConfig, SourceConfigBlock, DEFAULT_METADATA_INTERVAL_MS,
    DEFAULT_SOURCE_GRACE_PERIOD_MS, DEFAULT_SOURCE_REFRESH_PERIOD_MS, DEFAULT_UPDATE_MODE,
    SOURCE_TYPE_MSSQL, SOURCE_TYPE_NAS,
};
use crate::dremio::models::{NewSourceSpec, Source, UpdateSourceSpec};
use crate::dremio::DremioApi;
use crate::error::{ProviderError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Attributes every source kind carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCommonAttrs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(flatten)]
    pub metadata: MetadataPolicyAttrs,
    #[serde(flatten)]
    pub acceleration: SourceAccelerationAttrs,
}

impl SourceCommonAttrs {
    fn read_from(&mut self, source: &Source) {
        self.name = source.name.clone();
        self.description = source.description.clone();
        self.path = source.path.clone();
        self.metadata.apply(source.metadata_policy.as_ref());
        self.acceleration = SourceAccelerationAttrs::from_source(source);
    }
}

/// Schema shared by every source kind
pub fn source_schema(base: Schema) -> Schema {
    base.with("name", Attribute::required(AttrType::String).force_new())
        .with(
            "description",
            Attribute::optional(AttrType::String).with_default(""),
        )
        .with("path", Attribute::computed(AttrType::string_list()))
        .with(
            "auth_ttl_ms",
            Attribute::optional(AttrType::Int).with_default(DEFAULT_METADATA_INTERVAL_MS),
        )
        .with(
            "dataset_refresh_after_ms",
            Attribute::optional(AttrType::Int).with_default(DEFAULT_METADATA_INTERVAL_MS),
        )
        .with(
            "dataset_expire_after_ms",
            Attribute::optional(AttrType::Int).with_default(DEFAULT_METADATA_INTERVAL_MS),
        )
        .with(
            "names_refresh_ms",
            Attribute::optional(AttrType::Int).with_default(DEFAULT_METADATA_INTERVAL_MS),
        )
        .with(
            "update_mode",
            Attribute::optional(AttrType::String).with_default(DEFAULT_UPDATE_MODE),
        )
        .with(
            "acc_refresh_period_ms",
            Attribute::optional(AttrType::Int).with_default(DEFAULT_SOURCE_REFRESH_PERIOD_MS),
        )
        .with(
            "acc_grace_period_ms",
            Attribute::optional(AttrType::Int).with_default(DEFAULT_SOURCE_GRACE_PERIOD_MS),
        )
        .with(
            "acc_never_expire",
            Attribute::optional(AttrType::Bool).with_default(false),
        )
        .with(
            "acc_never_refresh",
            Attribute::optional(AttrType::Bool).with_default(false),
        )
}

/// What differs between source kinds: the type, its attributes and its config mapping
pub trait SourceVariant {
    const TYPE_NAME: &'static str;

    type Attrs: Serialize + DeserializeOwned + Default;

    fn schema() -> Schema;

    fn common(attrs: &Self::Attrs) -> &SourceCommonAttrs;

    fn common_mut(attrs: &mut Self::Attrs) -> &mut SourceCommonAttrs;

    fn source_config(attrs: &Self::Attrs) -> Result<SourceConfig>;

    /// Copy the type-specific part of a fetched source into the attributes
    fn read_config(attrs: &mut Self::Attrs, source: &Source) -> Result<()>;
}

/// Lifecycle shared by every [`SourceVariant`]
pub struct SourceResource<V>(PhantomData<V>);

impl<V: SourceVariant> Resource for SourceResource<V> {
    const TYPE_NAME: &'static str = V::TYPE_NAME;

    type Attrs = V::Attrs;

    fn schema() -> Schema {
        V::schema()
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let config = V::source_config(&data.attrs)?;
        let common = V::common(&data.attrs);
        let spec = NewSourceSpec {
            name: common.name.clone(),
            description: common.description.clone(),
            source_type: config.source_type().to_string(),
            config: config.to_wire()?,
            metadata_policy: common.metadata.to_policy(),
            acceleration_refresh_period_ms: common.acceleration.acc_refresh_period_ms,
            acceleration_grace_period_ms: common.acceleration.acc_grace_period_ms,
            acceleration_never_expire: common.acceleration.acc_never_expire,
            acceleration_never_refresh: common.acceleration.acc_never_refresh,
        };

        let source = client.new_source(&spec).await?;
        tracing::info!("Created {} source '{}' ({})", spec.source_type, spec.name, source.id);
        data.set_id(source.id);
        Self::read(client, data).await
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let source = client.get_source(data.id()?).await?;
        V::common_mut(&mut data.attrs).read_from(&source);
        V::read_config(&mut data.attrs, &source)
    }

    async fn update<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let config = V::source_config(&data.attrs)?;
        let common = V::common(&data.attrs);
        let spec = UpdateSourceSpec {
            description: common.description.clone(),
            config: config.to_wire()?,
            metadata_policy: common.metadata.to_policy(),
            acceleration_refresh_period_ms: common.acceleration.acc_refresh_period_ms,
            acceleration_grace_period_ms: common.acceleration.acc_grace_period_ms,
            acceleration_never_expire: common.acceleration.acc_never_expire,
            acceleration_never_refresh: common.acceleration.acc_never_refresh,
        };

        client.update_source(data.id()?, &spec).await?;
        data.touch();
        Self::read(client, data).await
    }

    async fn delete<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        client.delete_catalog_item(data.id()?).await?;
        data.clear_id();
        Ok(())
    }
}

fn expect_type(source: &Source, expected: &str) -> Result<()> {
    if source.source_type == expected {
        Ok(())
    } else {
        Err(ProviderError::invalid(format!(
            "Expected {expected} type, found {}",
            source.source_type
        )))
    }
}

// =============================================================================
// Generic source
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericSourceAttrs {
    #[serde(rename = "type", default)]
    pub source_type: String,
    #[serde(flatten)]
    pub common: SourceCommonAttrs,
    #[serde(default)]
    pub config: SourceConfigBlock,
    #[serde(default)]
    pub secure_config: SecureConfigBlock,
}

pub struct GenericSource;

impl SourceVariant for GenericSource {
    const TYPE_NAME: &'static str = "dremio_source";

    type Attrs = GenericSourceAttrs;

    fn schema() -> Schema {
        let config = Schema::new()
            .with("mount_path", Attribute::optional(AttrType::String))
            .with("username", Attribute::optional(AttrType::String))
            .with("hostname", Attribute::optional(AttrType::String))
            .with("port", Attribute::optional(AttrType::String))
            .with("authentication_type", Attribute::optional(AttrType::String))
            .with("fetch_size", Attribute::optional(AttrType::Int))
            .with("database", Attribute::optional(AttrType::String))
            .with(
                "show_only_connection_database",
                Attribute::optional(AttrType::Bool),
            );
        let secure = Schema::new().with(
            "password",
            Attribute::optional(AttrType::String).sensitive(),
        );

        source_schema(Schema::new())
            .with("type", Attribute::required(AttrType::String).force_new())
            .with("config", Attribute::required(AttrType::Object(config)))
            .with(
                "secure_config",
                Attribute::optional(AttrType::Object(secure)).sensitive(),
            )
    }

    fn common(attrs: &Self::Attrs) -> &SourceCommonAttrs {
        &attrs.common
    }

    fn common_mut(attrs: &mut Self::Attrs) -> &mut SourceCommonAttrs {
        &mut attrs.common
    }

    fn source_config(attrs: &Self::Attrs) -> Result<SourceConfig> {
        SourceConfig::from_blocks(&attrs.source_type, &attrs.config, &attrs.secure_config)
    }

    fn read_config(attrs: &mut Self::Attrs, source: &Source) -> Result<()> {
        attrs.source_type = source.source_type.clone();
        // Config of a type this provider cannot model is left as configured
        if !SourceConfig::is_supported(&source.source_type) {
            tracing::debug!("Keeping configured block for '{}' source", source.source_type);
            return Ok(());
        }
        attrs.config = SourceConfig::from_wire(&source.source_type, &source.config)?.to_block();
        Ok(())
    }
}

pub type SourceGenericResource = SourceResource<GenericSource>;

// =============================================================================
// NAS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NasSourceAttrs {
    #[serde(flatten)]
    pub common: SourceCommonAttrs,
    #[serde(default)]
    pub mount_path: String,
}

pub struct NasSource;

impl SourceVariant for NasSource {
    const TYPE_NAME: &'static str = "dremio_source_nas";

    type Attrs = NasSourceAttrs;

    fn schema() -> Schema {
        source_schema(Schema::new()).with("mount_path", Attribute::required(AttrType::String))
    }

    fn common(attrs: &Self::Attrs) -> &SourceCommonAttrs {
        &attrs.common
    }

    fn common_mut(attrs: &mut Self::Attrs) -> &mut SourceCommonAttrs {
        &mut attrs.common
    }

    fn source_config(attrs: &Self::Attrs) -> Result<SourceConfig> {
        Ok(SourceConfig::Nas(NasConfig {
            path: attrs.mount_path.clone(),
        }))
    }

    fn read_config(attrs: &mut Self::Attrs, source: &Source) -> Result<()> {
        expect_type(source, SOURCE_TYPE_NAS)?;
        attrs.common.path = source.path.clone();
        if let SourceConfig::Nas(nas) = SourceConfig::from_wire(SOURCE_TYPE_NAS, &source.config)? {
            attrs.mount_path = nas.path;
        }
        Ok(())
    }
}

pub type NasSourceResource = SourceResource<NasSource>;

// =============================================================================
// MSSQL
// =============================================================================

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MssqlSourceAttrs {
    #[serde(flatten)]
    pub common: SourceCommonAttrs,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub authentication_type: String,
    #[serde(default)]
    pub fetch_size: i64,
    #[serde(default)]
    pub database: String,
    #[serde(default = "default_true")]
    pub show_only_connection_database: bool,
}

impl Default for MssqlSourceAttrs {
    fn default() -> Self {
        Self {
            common: SourceCommonAttrs::default(),
            username: String::new(),
            password: String::new(),
            hostname: String::new(),
            port: String::new(),
            authentication_type: String::new(),
            fetch_size: 0,
            database: String::new(),
            show_only_connection_database: true,
        }
    }
}

pub struct MssqlSource;

impl SourceVariant for MssqlSource {
    const TYPE_NAME: &'static str = "dremio_source_mssql";

    type Attrs = MssqlSourceAttrs;

    fn schema() -> Schema {
        source_schema(Schema::new())
            .with("username", Attribute::required(AttrType::String))
            .with("password", Attribute::required(AttrType::String).sensitive())
            .with("hostname", Attribute::required(AttrType::String))
            .with("port", Attribute::required(AttrType::String))
            .with("authentication_type", Attribute::required(AttrType::String))
            .with("fetch_size", Attribute::optional(AttrType::Int).with_default(0))
            .with("database", Attribute::optional(AttrType::String).with_default(""))
            .with(
                "show_only_connection_database",
                Attribute::optional(AttrType::Bool).with_default(true),
            )
    }

    fn common(attrs: &Self::Attrs) -> &SourceCommonAttrs {
        &attrs.common
    }

    fn common_mut(attrs: &mut Self::Attrs) -> &mut SourceCommonAttrs {
        &mut attrs.common
    }

    fn source_config(attrs: &Self::Attrs) -> Result<SourceConfig> {
        Ok(SourceConfig::Mssql(MssqlConfig {
            username: attrs.username.clone(),
            password: attrs.password.clone(),
            hostname: attrs.hostname.clone(),
            port: attrs.port.clone(),
            authentication_type: attrs.authentication_type.clone(),
            fetch_size: attrs.fetch_size,
            database: attrs.database.clone(),
            show_only_connection_database: attrs.show_only_connection_database,
        }))
    }

    fn read_config(attrs: &mut Self::Attrs, source: &Source) -> Result<()> {
        expect_type(source, SOURCE_TYPE_MSSQL)?;
        // The service echoes a placeholder password; keep the configured one
        if let SourceConfig::Mssql(mssql) =
            SourceConfig::from_wire(SOURCE_TYPE_MSSQL, &source.config)?
        {
            attrs.username = mssql.username;
            attrs.hostname = mssql.hostname;
            attrs.port = mssql.port;
            attrs.authentication_type = mssql.authentication_type;
            attrs.fetch_size = mssql.fetch_size;
            attrs.database = mssql.database;
            attrs.show_only_connection_database = mssql.show_only_connection_database;
        }
        Ok(())
    }
}

pub type MssqlSourceResource = SourceResource<MssqlSource>;
