//! Entity field codecs
//!
//! Translation between the flat attributes written in configuration and the nested
//! payloads of the Dremio API. The codecs do no validation of remote payloads beyond
//! what deserialization itself enforces.
//!
//! - [`dataset`] - Formats, acceleration refresh policies and dataset columns
//! - [`reflection`] - Reflection field lists, including the simplified partition
//! - [`source`] - Typed source configuration and metadata policies

pub mod dataset;
pub mod reflection;
pub mod source;
