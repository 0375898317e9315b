//! Dataset field codecs
//!
//! Format options and acceleration refresh policies are copied field by field. When
//! the service returns no format or no policy, every attribute reads back as its zero
//! value rather than being left out.

use crate::catalog::query_path;
use crate::dremio::models::{Dataset, DatasetAccelerationRefreshPolicy, DatasetFormat};
use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REFRESH_PERIOD_MS: i64 = 10_800_000;
pub const DEFAULT_GRACE_PERIOD_MS: i64 = 32_400_000;
pub const DEFAULT_REFRESH_METHOD: &str = "FULL";
pub const REFRESH_METHODS: &[&str] = &["FULL", "INCREMENTAL"];

fn default_refresh_period_ms() -> i64 {
    DEFAULT_REFRESH_PERIOD_MS
}

fn default_grace_period_ms() -> i64 {
    DEFAULT_GRACE_PERIOD_MS
}

fn default_refresh_method() -> String {
    DEFAULT_REFRESH_METHOD.to_string()
}

/// Acceleration refresh policy attributes of a physical dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelerationAttrs {
    #[serde(default = "default_refresh_period_ms")]
    pub acc_refresh_period_ms: i64,
    #[serde(default = "default_grace_period_ms")]
    pub acc_grace_period_ms: i64,
    #[serde(default = "default_refresh_method")]
    pub acc_method: String,
    #[serde(default)]
    pub acc_refresh_field: String,
}

impl Default for AccelerationAttrs {
    fn default() -> Self {
        Self {
            acc_refresh_period_ms: DEFAULT_REFRESH_PERIOD_MS,
            acc_grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
            acc_method: default_refresh_method(),
            acc_refresh_field: String::new(),
        }
    }
}

impl AccelerationAttrs {
    pub fn to_policy(&self) -> Result<DatasetAccelerationRefreshPolicy> {
        if !REFRESH_METHODS.contains(&self.acc_method.as_str()) {
            return Err(ProviderError::invalid(format!(
                "acc_method must be 'FULL' or 'INCREMENTAL', got: {}",
                self.acc_method
            )));
        }
        Ok(DatasetAccelerationRefreshPolicy {
            refresh_period_ms: self.acc_refresh_period_ms,
            grace_period_ms: self.acc_grace_period_ms,
            method: self.acc_method.clone(),
            refresh_field: self.acc_refresh_field.clone(),
        })
    }

    /// Absent policy reads back as zeros and empty strings
    pub fn from_policy(policy: Option<&DatasetAccelerationRefreshPolicy>) -> Self {
        match policy {
            Some(p) => Self {
                acc_refresh_period_ms: p.refresh_period_ms,
                acc_grace_period_ms: p.grace_period_ms,
                acc_method: p.method.clone(),
                acc_refresh_field: p.refresh_field.clone(),
            },
            None => Self {
                acc_refresh_period_ms: 0,
                acc_grace_period_ms: 0,
                acc_method: String::new(),
                acc_refresh_field: String::new(),
            },
        }
    }
}

/// Format attributes of a promoted dataset; only those relevant to `type` matter remotely
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatAttrs {
    #[serde(rename = "type")]
    pub format_type: String,
    pub field_delimiter: String,
    pub line_delimiter: String,
    pub quote: String,
    pub comment: String,
    pub escape: String,
    pub skip_first_line: bool,
    pub extract_header: bool,
    pub trim_header: bool,
    pub auto_generate_column_names: bool,
    pub sheet_name: String,
    pub has_merged_cells: bool,
}

impl FormatAttrs {
    pub fn to_format(&self) -> DatasetFormat {
        DatasetFormat {
            format_type: self.format_type.clone(),
            field_delimiter: self.field_delimiter.clone(),
            line_delimiter: self.line_delimiter.clone(),
            quote: self.quote.clone(),
            comment: self.comment.clone(),
            escape: self.escape.clone(),
            skip_first_line: self.skip_first_line,
            extract_header: self.extract_header,
            trim_header: self.trim_header,
            auto_generate_column_names: self.auto_generate_column_names,
            sheet_name: self.sheet_name.clone(),
            has_merged_cells: self.has_merged_cells,
        }
    }

    pub fn from_format(format: Option<&DatasetFormat>) -> Self {
        let Some(f) = format else {
            return Self::default();
        };
        Self {
            format_type: f.format_type.clone(),
            field_delimiter: f.field_delimiter.clone(),
            line_delimiter: f.line_delimiter.clone(),
            quote: f.quote.clone(),
            comment: f.comment.clone(),
            escape: f.escape.clone(),
            skip_first_line: f.skip_first_line,
            extract_header: f.extract_header,
            trim_header: f.trim_header,
            auto_generate_column_names: f.auto_generate_column_names,
            sheet_name: f.sheet_name.clone(),
            has_merged_cells: f.has_merged_cells,
        }
    }
}

/// One column of a dataset schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAttr {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Computed attributes every dataset resource carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetCommonAttrs {
    pub fields: Vec<FieldAttr>,
    pub path: Vec<String>,
    pub query_path: String,
}

impl DatasetCommonAttrs {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            fields: dataset
                .fields
                .iter()
                .map(|f| FieldAttr {
                    name: f.name.clone(),
                    field_type: f.field_type.name.clone(),
                })
                .collect(),
            path: dataset.path.clone(),
            query_path: query_path(&dataset.path),
        }
    }
}
