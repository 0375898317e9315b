//! Reflection field codecs
//!
//! Converts between the field lists written in configuration and the field
//! representations of the reflection API. Three shapes exist:
//!
//! - plain name lists (display, distribution, partition and sort fields)
//! - dimension fields with a granularity and measure fields with measure types
//! - the simplified partition, where granularity and measure type are implied by which
//!   list a name appears in

use crate::dremio::models::{ReflectionField, ReflectionFieldWithGranularity, ReflectionMeasureField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const GRANULARITY_NORMAL: &str = "NORMAL";
pub const GRANULARITY_DATE: &str = "DATE";
pub const MEASURE_SUM: &str = "SUM";

/// Dimension field as configured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionField {
    pub name: String,
    pub granularity: String,
}

/// Measure field as configured; measure types form a set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureField {
    pub name: String,
    pub measure: BTreeSet<String>,
}

pub fn encode_field_names(names: &[String]) -> Vec<ReflectionField> {
    names
        .iter()
        .map(|name| ReflectionField { name: name.clone() })
        .collect()
}

pub fn decode_field_names(fields: &[ReflectionField]) -> Vec<String> {
    fields.iter().map(|f| f.name.clone()).collect()
}

pub fn encode_dimension_fields(fields: &[DimensionField]) -> Vec<ReflectionFieldWithGranularity> {
    fields
        .iter()
        .map(|f| ReflectionFieldWithGranularity {
            name: f.name.clone(),
            granularity: f.granularity.clone(),
        })
        .collect()
}

pub fn decode_dimension_fields(fields: &[ReflectionFieldWithGranularity]) -> Vec<DimensionField> {
    fields
        .iter()
        .map(|f| DimensionField {
            name: f.name.clone(),
            granularity: f.granularity.clone(),
        })
        .collect()
}

pub fn encode_measure_fields(fields: &[MeasureField]) -> Vec<ReflectionMeasureField> {
    fields
        .iter()
        .map(|f| ReflectionMeasureField {
            name: f.name.clone(),
            measure_type_list: f.measure.iter().cloned().collect(),
        })
        .collect()
}

pub fn decode_measure_fields(fields: &[ReflectionMeasureField]) -> Vec<MeasureField> {
    fields
        .iter()
        .map(|f| MeasureField {
            name: f.name.clone(),
            measure: f.measure_type_list.iter().cloned().collect(),
        })
        .collect()
}

// =============================================================================
// Simplified partition
// =============================================================================

/// NORMAL names first, then DATE names
pub fn encode_simple_dimensions(
    normal: &[String],
    date: &[String],
) -> Vec<ReflectionFieldWithGranularity> {
    let with = |granularity: &'static str| {
        move |name: &String| ReflectionFieldWithGranularity {
            name: name.clone(),
            granularity: granularity.to_string(),
        }
    };
    normal
        .iter()
        .map(with(GRANULARITY_NORMAL))
        .chain(date.iter().map(with(GRANULARITY_DATE)))
        .collect()
}

/// Split into (NORMAL, DATE) name lists; any other granularity is dropped
pub fn decode_simple_dimensions(
    fields: &[ReflectionFieldWithGranularity],
) -> (Vec<String>, Vec<String>) {
    let mut normal = Vec::new();
    let mut date = Vec::new();
    for field in fields {
        match field.granularity.as_str() {
            GRANULARITY_NORMAL => normal.push(field.name.clone()),
            GRANULARITY_DATE => date.push(field.name.clone()),
            other => {
                tracing::debug!(
                    "Dropping dimension '{}' with granularity '{}'",
                    field.name,
                    other
                );
            }
        }
    }
    (normal, date)
}

pub fn encode_sum_measures(names: &[String]) -> Vec<ReflectionMeasureField> {
    names
        .iter()
        .map(|name| ReflectionMeasureField {
            name: name.clone(),
            measure_type_list: vec![MEASURE_SUM.to_string()],
        })
        .collect()
}

/// Names whose measure list is exactly `["SUM"]`; everything else is dropped
pub fn decode_sum_measures(fields: &[ReflectionMeasureField]) -> Vec<String> {
    fields
        .iter()
        .filter(|f| matches!(f.measure_type_list.as_slice(), [only] if only == MEASURE_SUM))
        .map(|f| f.name.clone())
        .collect()
}
