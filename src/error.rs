//! Provider errors and host diagnostics
//!
//! Every failure in the provider is one of a handful of classes. Nothing in this crate
//! recovers from them locally: adapters return the error immediately and the host turns
//! it into a [`Diagnostic`].

use serde::Serialize;
use thiserror::Error;

/// Result alias used across the provider
pub type Result<T, E = ProviderError> = std::result::Result<T, E>;

/// Errors raised by the path resolver, the codecs, the adapters and the API client
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Configuration cannot be turned into a request
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The remote service has no entity at the given id or path
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote service rejected a write because the version token is stale
    #[error("write conflict: {0}")]
    RemoteWriteConflict(String),

    /// Any other failure talking to the remote service
    #[error("remote request failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    RemoteTransport {
        status: Option<u16>,
        message: String,
    },

    /// A payload did not have the expected shape
    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::RemoteTransport {
            status: None,
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status to its error class
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Self::NotFound(message),
            409 => Self::RemoteWriteConflict(message),
            _ => Self::RemoteTransport {
                status: Some(status),
                message,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Short, stable summary for diagnostics
    pub fn summary(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "Invalid configuration",
            Self::NotFound(_) => "Entity not found",
            Self::RemoteWriteConflict(_) => "Conflicting write",
            Self::RemoteTransport { .. } => "Dremio request failed",
            Self::Decode(_) => "Unexpected response payload",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::RemoteTransport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Diagnostic severity reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// Host-facing diagnostic
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl From<&ProviderError> for Diagnostic {
    fn from(err: &ProviderError) -> Self {
        Self {
            severity: Severity::Error,
            summary: err.summary().to_string(),
            detail: err.to_string(),
        }
    }
}

impl From<ProviderError> for Diagnostic {
    fn from(err: ProviderError) -> Self {
        Self::from(&err)
    }
}
