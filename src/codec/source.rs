//! Source configuration codecs
//!
//! A source's `config` payload depends on its type. [`SourceConfig`] is the typed form,
//! with the type string as discriminator; unknown types are a configuration error.

use crate::dremio::models::{Source, SourceMetadataPolicy};
use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SOURCE_TYPE_NAS: &str = "NAS";
pub const SOURCE_TYPE_MSSQL: &str = "MSSQL";

pub const DEFAULT_METADATA_INTERVAL_MS: i64 = 3_600_000;
pub const DEFAULT_UPDATE_MODE: &str = "PREFETCH_QUERIED";
pub const DEFAULT_SOURCE_REFRESH_PERIOD_MS: i64 = 10_800_000;
pub const DEFAULT_SOURCE_GRACE_PERIOD_MS: i64 = 32_400_000;

/// Network attached storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NasConfig {
    pub path: String,
}

/// Microsoft SQL Server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MssqlConfig {
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub hostname: String,
    pub port: String,
    pub authentication_type: String,
    #[serde(default)]
    pub fetch_size: i64,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub show_only_connection_database: bool,
}

/// Typed source configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Nas(NasConfig),
    Mssql(MssqlConfig),
}

impl SourceConfig {
    /// Discriminator sent as the source `type`
    pub fn source_type(&self) -> &'static str {
        match self {
            Self::Nas(_) => SOURCE_TYPE_NAS,
            Self::Mssql(_) => SOURCE_TYPE_MSSQL,
        }
    }

    pub fn to_wire(&self) -> Result<Value> {
        Ok(match self {
            Self::Nas(config) => serde_json::to_value(config)?,
            Self::Mssql(config) => serde_json::to_value(config)?,
        })
    }

    pub fn is_supported(source_type: &str) -> bool {
        matches!(source_type, SOURCE_TYPE_NAS | SOURCE_TYPE_MSSQL)
    }

    pub fn from_wire(source_type: &str, config: &Value) -> Result<Self> {
        match source_type {
            SOURCE_TYPE_NAS => Ok(Self::Nas(NasConfig::deserialize(config)?)),
            SOURCE_TYPE_MSSQL => Ok(Self::Mssql(MssqlConfig::deserialize(config)?)),
            other => Err(unsupported(other)),
        }
    }

    /// Build from the generic `config` and `secure_config` blocks
    pub fn from_blocks(
        source_type: &str,
        config: &SourceConfigBlock,
        secure: &SecureConfigBlock,
    ) -> Result<Self> {
        match source_type {
            SOURCE_TYPE_NAS => Ok(Self::Nas(NasConfig {
                path: config.mount_path.clone(),
            })),
            SOURCE_TYPE_MSSQL => Ok(Self::Mssql(MssqlConfig {
                username: config.username.clone(),
                password: secure.password.clone(),
                hostname: config.hostname.clone(),
                port: config.port.clone(),
                authentication_type: config.authentication_type.clone(),
                fetch_size: config.fetch_size,
                database: config.database.clone(),
                show_only_connection_database: config.show_only_connection_database,
            })),
            other => Err(unsupported(other)),
        }
    }

    /// Generic `config` block; the password never reads back
    pub fn to_block(&self) -> SourceConfigBlock {
        match self {
            Self::Nas(nas) => SourceConfigBlock {
                mount_path: nas.path.clone(),
                ..SourceConfigBlock::default()
            },
            Self::Mssql(mssql) => SourceConfigBlock {
                username: mssql.username.clone(),
                hostname: mssql.hostname.clone(),
                port: mssql.port.clone(),
                authentication_type: mssql.authentication_type.clone(),
                fetch_size: mssql.fetch_size,
                database: mssql.database.clone(),
                show_only_connection_database: mssql.show_only_connection_database,
                ..SourceConfigBlock::default()
            },
        }
    }
}

fn unsupported(source_type: &str) -> ProviderError {
    ProviderError::invalid(format!("unsupported source type '{source_type}'"))
}

/// Union of every type's non-secret config attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfigBlock {
    pub mount_path: String,
    pub username: String,
    pub hostname: String,
    pub port: String,
    pub authentication_type: String,
    pub fetch_size: i64,
    pub database: String,
    pub show_only_connection_database: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecureConfigBlock {
    pub password: String,
}

fn default_interval_ms() -> i64 {
    DEFAULT_METADATA_INTERVAL_MS
}

fn default_update_mode() -> String {
    DEFAULT_UPDATE_MODE.to_string()
}

fn default_source_refresh_ms() -> i64 {
    DEFAULT_SOURCE_REFRESH_PERIOD_MS
}

fn default_source_grace_ms() -> i64 {
    DEFAULT_SOURCE_GRACE_PERIOD_MS
}

/// Metadata refresh attributes shared by every source resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPolicyAttrs {
    #[serde(default = "default_interval_ms")]
    pub auth_ttl_ms: i64,
    #[serde(default = "default_interval_ms")]
    pub dataset_refresh_after_ms: i64,
    #[serde(default = "default_interval_ms")]
    pub dataset_expire_after_ms: i64,
    #[serde(default = "default_interval_ms")]
    pub names_refresh_ms: i64,
    #[serde(default = "default_update_mode")]
    pub update_mode: String,
}

impl Default for MetadataPolicyAttrs {
    fn default() -> Self {
        Self {
            auth_ttl_ms: DEFAULT_METADATA_INTERVAL_MS,
            dataset_refresh_after_ms: DEFAULT_METADATA_INTERVAL_MS,
            dataset_expire_after_ms: DEFAULT_METADATA_INTERVAL_MS,
            names_refresh_ms: DEFAULT_METADATA_INTERVAL_MS,
            update_mode: default_update_mode(),
        }
    }
}

impl MetadataPolicyAttrs {
    pub fn to_policy(&self) -> SourceMetadataPolicy {
        SourceMetadataPolicy {
            auth_ttl_ms: self.auth_ttl_ms,
            dataset_refresh_after_ms: self.dataset_refresh_after_ms,
            dataset_expire_after_ms: self.dataset_expire_after_ms,
            names_refresh_ms: self.names_refresh_ms,
            dataset_update_mode: self.update_mode.clone(),
        }
    }

    /// Copy a returned policy in; an absent policy leaves the attributes as they are
    pub fn apply(&mut self, policy: Option<&SourceMetadataPolicy>) {
        if let Some(p) = policy {
            self.auth_ttl_ms = p.auth_ttl_ms;
            self.dataset_refresh_after_ms = p.dataset_refresh_after_ms;
            self.dataset_expire_after_ms = p.dataset_expire_after_ms;
            self.names_refresh_ms = p.names_refresh_ms;
            self.update_mode = p.dataset_update_mode.clone();
        }
    }
}

/// Reflection refresh attributes of a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAccelerationAttrs {
    #[serde(default = "default_source_refresh_ms")]
    pub acc_refresh_period_ms: i64,
    #[serde(default = "default_source_grace_ms")]
    pub acc_grace_period_ms: i64,
    #[serde(default)]
    pub acc_never_expire: bool,
    #[serde(default)]
    pub acc_never_refresh: bool,
}

impl Default for SourceAccelerationAttrs {
    fn default() -> Self {
        Self {
            acc_refresh_period_ms: DEFAULT_SOURCE_REFRESH_PERIOD_MS,
            acc_grace_period_ms: DEFAULT_SOURCE_GRACE_PERIOD_MS,
            acc_never_expire: false,
            acc_never_refresh: false,
        }
    }
}

impl SourceAccelerationAttrs {
    pub fn from_source(source: &Source) -> Self {
        Self {
            acc_refresh_period_ms: source.acceleration_refresh_period_ms,
            acc_grace_period_ms: source.acceleration_grace_period_ms,
            acc_never_expire: source.acceleration_never_expire,
            acc_never_refresh: source.acceleration_never_refresh,
        }
    }
}
