//! Resource schemas
//!
//! Typed descriptions of the attributes a resource or data source accepts. Builders
//! consume a schema and return the extended one, so a shared builder can be reused by
//! several resource kinds without them seeing each other's attributes.

use crate::error::{ProviderError, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Attributes every state carries that no schema declares
const IMPLICIT_ATTRIBUTES: &[&str] = &["id", "last_updated"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrType {
    String,
    Int,
    Bool,
    List(Box<AttrType>),
    Set(Box<AttrType>),
    Object(Schema),
}

impl AttrType {
    pub fn list_of(inner: AttrType) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn set_of(inner: AttrType) -> Self {
        Self::Set(Box::new(inner))
    }

    pub fn string_list() -> Self {
        Self::list_of(Self::String)
    }

    fn check(&self, name: &str, value: &Value) -> Result<()> {
        let ok = match (self, value) {
            (_, Value::Null) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Int, Value::Number(n)) => n.is_i64(),
            (Self::Bool, Value::Bool(_)) => true,
            (Self::List(inner) | Self::Set(inner), Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.check(&format!("{name}[{i}]"), item)?;
                }
                true
            }
            (Self::Object(schema), Value::Object(_)) => {
                schema.validate_nested(name, value)?;
                true
            }
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(ProviderError::invalid(format!(
                "attribute '{name}' expected {}, got {value}",
                self.describe()
            )))
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::String => "a string".to_string(),
            Self::Int => "an integer".to_string(),
            Self::Bool => "a boolean".to_string(),
            Self::List(inner) => format!("a list of {}", inner.describe()),
            Self::Set(inner) => format!("a set of {}", inner.describe()),
            Self::Object(_) => "an object".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    Computed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub ty: AttrType,
    pub presence: Presence,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force_new: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Attribute {
    fn new(ty: AttrType, presence: Presence) -> Self {
        Self {
            ty,
            presence,
            force_new: false,
            sensitive: false,
            default: None,
        }
    }

    pub fn required(ty: AttrType) -> Self {
        Self::new(ty, Presence::Required)
    }

    pub fn optional(ty: AttrType) -> Self {
        Self::new(ty, Presence::Optional)
    }

    pub fn computed(ty: AttrType) -> Self {
        Self::new(ty, Presence::Computed)
    }

    /// Changing this attribute replaces the resource
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Ordered attribute map
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return this schema with `name` added (or replaced)
    pub fn with(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Check a configuration object against this schema
    pub fn validate(&self, value: &Value) -> Result<()> {
        self.validate_object(None, value)
    }

    fn validate_nested(&self, name: &str, value: &Value) -> Result<()> {
        self.validate_object(Some(name), value)
    }

    fn validate_object(&self, parent: Option<&str>, value: &Value) -> Result<()> {
        let qualify = |key: &str| match parent {
            Some(parent) => format!("{parent}.{key}"),
            None => key.to_string(),
        };

        let Value::Object(map) = value else {
            return Err(ProviderError::invalid(format!(
                "expected an object of attributes, got {value}"
            )));
        };

        for (key, item) in map {
            if parent.is_none() && IMPLICIT_ATTRIBUTES.contains(&key.as_str()) {
                continue;
            }
            let Some(attribute) = self.attributes.get(key) else {
                return Err(ProviderError::invalid(format!(
                    "unsupported attribute '{}'",
                    qualify(key)
                )));
            };
            attribute.ty.check(&qualify(key), item)?;
        }

        for (key, attribute) in &self.attributes {
            if attribute.presence == Presence::Required
                && map.get(key).map_or(true, Value::is_null)
            {
                return Err(ProviderError::invalid(format!(
                    "missing required attribute '{}'",
                    qualify(key)
                )));
            }
        }

        Ok(())
    }
}
