//! Repositories backed by the platform's HTTP API.
//!
//! Every response body is the same envelope:
//!
//! ```json
//! { "success": true, "data": { ... }, "message": null }
//! ```
//!
//! Bodies are parsed strictly; a body that is not an envelope is a parsing
//! error rather than something to guess at.

use std::time::Duration;

use assess_core::model::{DiagnosticConfig, DiagnosticId, DiagnosticResult, PriorResult, UserId};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storage::repository::{DiagnosticRepository, ResultRepository, StorageError};

const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Read `ASSESS_API_BASE_URL`, `ASSESS_API_TOKEN`, and `ASSESS_API_TIMEOUT_SECS`.
    ///
    /// Returns `None` when no base URL is configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with a custom variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let base_url = lookup("ASSESS_API_BASE_URL")?;
        if base_url.trim().is_empty() {
            return None;
        }
        let token = lookup("ASSESS_API_TOKEN").filter(|t| !t.trim().is_empty());
        let timeout_secs = lookup("ASSESS_API_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Some(Self {
            base_url: base_url.trim().to_string(),
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope<T> {
    success: bool,
    #[serde(default = "none")]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

fn none<T>() -> Option<T> {
    None
}

/// Parse an envelope, returning its `data`.
fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, StorageError> {
    let envelope: Envelope<T> = serde_json::from_slice(body)
        .map_err(|e| StorageError::Serialization(format!("response envelope: {e}")))?;
    if !envelope.success {
        let message = envelope
            .message
            .unwrap_or_else(|| "request rejected".to_string());
        return Err(StorageError::Connection(message));
    }
    Ok(envelope.data)
}

fn require_data<T>(data: Option<T>) -> Result<T, StorageError> {
    data.ok_or_else(|| StorageError::Serialization("response envelope has no data".into()))
}

fn transport(err: reqwest::Error) -> StorageError {
    StorageError::Connection(err.to_string())
}

#[derive(Clone)]
pub struct RemoteRepository {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl RemoteRepository {
    /// Build a repository for the configured API.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the base URL is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, StorageError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| StorageError::Connection(format!("invalid base url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StorageError::Connection("base url cannot hold a path".into()));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            base_url,
            token: config.token,
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>, StorageError> {
        let response = self.authorize(request).send().await.map_err(transport)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound);
        }
        if !status.is_success() {
            return Err(StorageError::Connection(format!(
                "request failed with status {status}"
            )));
        }
        let body = response.bytes().await.map_err(transport)?;
        decode_envelope(&body)
    }

    async fn write<B: Serialize + Sync>(
        &self,
        request: reqwest::RequestBuilder,
        body: &B,
    ) -> Result<(), StorageError> {
        self.send::<serde_json::Value>(request.json(body))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl DiagnosticRepository for RemoteRepository {
    async fn get_diagnostic(&self, id: &DiagnosticId) -> Result<DiagnosticConfig, StorageError> {
        let url = self.url(&["diagnostics", id.as_str()]);
        require_data(self.send(self.client.get(url)).await?)
    }

    async fn upsert_diagnostic(&self, config: &DiagnosticConfig) -> Result<(), StorageError> {
        let url = self.url(&["diagnostics", config.id.as_str()]);
        self.write(self.client.put(url), config).await
    }
}

#[async_trait]
impl ResultRepository for RemoteRepository {
    async fn find_result(
        &self,
        diagnostic_id: &DiagnosticId,
        user_id: &UserId,
    ) -> Result<PriorResult, StorageError> {
        let url = self.url(&[
            "diagnostic-results",
            diagnostic_id.as_str(),
            user_id.as_str(),
        ]);
        match self.send(self.client.get(url)).await {
            Ok(data) => require_data(data),
            Err(StorageError::NotFound) => Ok(PriorResult::none()),
            Err(err) => Err(err),
        }
    }

    async fn submit_result(&self, result: &DiagnosticResult) -> Result<(), StorageError> {
        let url = self.url(&["diagnostic-results"]);
        self.write(self.client.post(url), result).await
    }
}
