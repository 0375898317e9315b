//! Plan files
//!
//! A plan is an ordered list of lifecycle steps, written in YAML or JSON, that the CLI
//! runs against a [`Provider`]. Named steps remember their resulting state: a later step
//! with the same name starts from it, and any string of the form `${name.attribute}`
//! is replaced by that attribute of the named state.
//!
//! ```yaml
//! steps:
//!   - name: analytics
//!     resource: dremio_space
//!     config: { name: Analytics }
//!   - name: readme
//!     resource: dremio_entity_wiki
//!     config: { entity_id: "${analytics.id}", text: "# Analytics" }
//!   - name: analytics
//!     resource: dremio_space
//!     op: delete
//! ```

use crate::dremio::DremioApi;
use crate::resource::{Operation, Provider, Response};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

fn default_op() -> Operation {
    Operation::Create
}

/// One step of a plan: a resource operation or a data source read
#[derive(Debug, Clone, Deserialize)]
pub struct PlanStep {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub data_source: Option<String>,
    #[serde(default = "default_op")]
    pub op: Operation,
    #[serde(default)]
    pub config: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
}

impl Plan {
    /// Parse YAML (or JSON, which YAML accepts)
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse plan")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan {:?}", path))?;
        Self::parse(&content)
    }
}

/// Result of one step
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub type_name: String,
    pub op: String,
    #[serde(flatten)]
    pub response: Response,
}

/// Run every step in order, stopping after the first one that reports a diagnostic
pub async fn apply_plan<C: DremioApi>(
    provider: &Provider<C>,
    plan: &Plan,
) -> Result<Vec<StepOutcome>> {
    let mut states: HashMap<String, Value> = HashMap::new();
    let mut outcomes = Vec::with_capacity(plan.steps.len());

    for (index, step) in plan.steps.iter().enumerate() {
        let config = match &step.config {
            Value::Null => Value::Object(Map::new()),
            config => interpolate(config, &states)
                .with_context(|| format!("step {}", index + 1))?,
        };

        let (type_name, op, response) = match (&step.resource, &step.data_source) {
            (Some(resource), None) => {
                let input = match step.name.as_ref().and_then(|n| states.get(n)) {
                    Some(previous) => overlay(previous, &config),
                    None => config,
                };
                let response = provider.apply(resource, step.op, input).await;
                (resource.clone(), step.op.to_string(), response)
            }
            (None, Some(data_source)) => {
                let response = provider.read_data_source(data_source, config).await;
                (data_source.clone(), "read".to_string(), response)
            }
            _ => bail!(
                "step {} must name exactly one of 'resource' or 'data_source'",
                index + 1
            ),
        };

        if let Some(name) = &step.name {
            states.insert(name.clone(), response.state.clone());
        }

        let failed = !response.is_ok();
        outcomes.push(StepOutcome {
            name: step.name.clone(),
            type_name,
            op,
            response,
        });
        if failed {
            tracing::warn!("Plan stopped at step {}", index + 1);
            break;
        }
    }

    Ok(outcomes)
}

/// `base` with every key of `config` written over it
fn overlay(base: &Value, config: &Value) -> Value {
    let mut merged: Map<String, Value> = base.as_object().cloned().unwrap_or_default();
    if let Value::Object(extra) = config {
        merged.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    Value::Object(merged)
}

/// Replace `${name.attribute}` strings with values from earlier states
fn interpolate(value: &Value, states: &HashMap<String, Value>) -> Result<Value> {
    Ok(match value {
        Value::String(s) => match reference(s) {
            Some((name, attribute)) => {
                let Some(state) = states.get(name) else {
                    bail!("unknown step '{name}' in '{s}'");
                };
                match state.get(attribute) {
                    Some(found) if !found.is_null() => found.clone(),
                    _ => bail!("step '{name}' has no '{attribute}'"),
                }
            }
            None => value.clone(),
        },
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| interpolate(item, states))
                .collect::<Result<_>>()?,
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), interpolate(v, states)?)))
                .collect::<Result<_>>()?,
        ),
        other => other.clone(),
    })
}

fn reference(s: &str) -> Option<(&str, &str)> {
    s.strip_prefix("${")?.strip_suffix('}')?.split_once('.')
}
