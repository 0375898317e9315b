//! HTTP utilities for Dremio REST API calls

use crate::error::{ProviderError, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull the `errorMessage` Dremio puts in error bodies, falling back to the status text
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("errorMessage")
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| status.to_string())
}

/// HTTP client wrapper for Dremio API calls
#[derive(Clone)]
pub struct DremioHttpClient {
    client: Client,
}

impl DremioHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dremio-provider/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Make a GET request
    pub async fn get(&self, url: &str, auth: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);
        self.send(self.client.get(url).header(AUTHORIZATION, auth))
            .await
    }

    /// Make a POST request with a JSON body
    pub async fn post<B: Serialize + ?Sized>(&self, url: &str, auth: &str, body: &B) -> Result<Value> {
        tracing::debug!("POST {}", url);
        self.send(self.client.post(url).header(AUTHORIZATION, auth).json(body))
            .await
    }

    /// POST without credentials (login)
    pub async fn post_anonymous<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Value> {
        tracing::debug!("POST {}", url);
        self.send(self.client.post(url).json(body)).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put<B: Serialize + ?Sized>(&self, url: &str, auth: &str, body: &B) -> Result<Value> {
        tracing::debug!("PUT {}", url);
        self.send(self.client.put(url).header(AUTHORIZATION, auth).json(body))
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str, auth: &str) -> Result<Value> {
        tracing::debug!("DELETE {}", url);
        self.send(self.client.delete(url).header(AUTHORIZATION, auth))
            .await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ProviderError::from_status(
                status.as_u16(),
                error_message(status, &body),
            ));
        }

        // Handle empty response
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}
