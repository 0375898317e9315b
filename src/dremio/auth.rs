//! Dremio Authentication
//!
//! Personal access tokens are sent as bearer tokens. Username/password credentials are
//! exchanged for a session token at `/apiv2/login`, which is cached until shortly before
//! it expires.

use super::http::DremioHttpClient;
use crate::error::{ProviderError, Result};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Refresh session tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Session lifetime if the login response does not say (Dremio defaults to 30 hours)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60 * 60);

/// How the provider authenticates
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    Password { username: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    /// Absolute expiry in epoch milliseconds
    #[serde(default)]
    expires: Option<i64>,
}

#[derive(Clone)]
struct CachedToken {
    header: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Credentials holder with session token caching
#[derive(Clone)]
pub struct DremioCredentials {
    credentials: Credentials,
    login_url: String,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl DremioCredentials {
    pub fn new(credentials: Credentials, base_url: &str) -> Self {
        Self {
            credentials,
            login_url: format!("{}/apiv2/login", base_url.trim_end_matches('/')),
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Value for the `Authorization` header
    pub async fn authorization(&self, http: &DremioHttpClient) -> Result<String> {
        let (username, password) = match &self.credentials {
            Credentials::ApiKey(key) => return Ok(format!("Bearer {key}")),
            Credentials::Password { username, password } => (username, password),
        };

        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.header.clone());
                }
                tracing::debug!("Cached session token expired, logging in again");
            }
        }

        let response = http
            .post_anonymous(
                &self.login_url,
                &json!({ "userName": username, "password": password }),
            )
            .await
            .map_err(|err| match err {
                ProviderError::RemoteTransport { status: Some(401), .. } => {
                    ProviderError::invalid("login rejected: check username and password")
                }
                other => other,
            })?;
        let login: LoginResponse = serde_json::from_value(response)?;

        let ttl = login
            .expires
            .and_then(|ms| {
                let remaining = ms - chrono::Utc::now().timestamp_millis();
                u64::try_from(remaining).ok().map(Duration::from_millis)
            })
            .unwrap_or(DEFAULT_TOKEN_TTL);
        let expires_at = Instant::now() + ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);

        let header = format!("_dremio{}", login.token);
        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                header: header.clone(),
                expires_at,
            });
        }

        tracing::debug!("New session token cached for {}", username);
        Ok(header)
    }
}
