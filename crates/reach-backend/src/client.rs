//! Aggregation backend client implementation.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use reach_core::defaults;

use crate::error::{UpstreamError, UpstreamResult};

/// Default backend endpoint.
pub const DEFAULT_BACKEND_URL: &str = defaults::BACKEND_URL;

/// Timeout for backend requests (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = defaults::BACKEND_TIMEOUT_SECS;

/// Query parameters accepted by the email list endpoint.
///
/// Only the parameters actually set are appended to the upstream URL;
/// absent ones are omitted entirely rather than sent empty. Deserializable
/// so the proxy can lift it straight out of the inbound query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailQuery {
    pub account: Option<String>,
    pub folder: Option<String>,
    pub category: Option<String>,
    pub limit: Option<u32>,
}

impl EmailQuery {
    /// The exact parameter pairs to forward upstream.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(account) = &self.account {
            params.push(("account", account.clone()));
        }
        if let Some(folder) = &self.folder {
            params.push(("folder", folder.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// HTTP client for the aggregation backend.
///
/// Every method maps to one backend route and returns the response body as
/// raw [`Value`] so callers can propagate it unchanged.
pub struct SyncBackend {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl SyncBackend {
    /// Create a new backend client with default settings.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_BACKEND_URL.to_string())
    }

    /// Create a new backend client for a specific base URL.
    pub fn with_config(base_url: String) -> Self {
        let timeout_secs = std::env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(REQUEST_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            "Initializing aggregation backend client: url={}, timeout={}s",
            base_url, timeout_secs
        );

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        }
    }

    /// Create from environment variables (`PYTHON_BACKEND_URL`).
    pub fn from_env() -> Self {
        let base_url = std::env::var("PYTHON_BACKEND_URL")
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        Self::with_config(base_url)
    }

    /// Base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Emails
    // ========================================================================

    /// List synchronized emails, forwarding exactly the provided filters.
    #[instrument(skip(self, query), fields(subsystem = "backend", op = "list_emails"))]
    pub async fn list_emails(&self, query: &EmailQuery) -> UpstreamResult<Value> {
        let start = Instant::now();
        let response = self
            .client
            .get(format!("{}/api/emails", self.base_url))
            .query(&query.params())
            .send()
            .await?;
        let value = decode(response).await?;
        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            "Email list fetched"
        );
        Ok(value)
    }

    /// Fetch one email by id.
    pub async fn get_email(&self, id: &str) -> UpstreamResult<Value> {
        let response = self
            .client
            .get(format!("{}/api/emails/{}", self.base_url, id))
            .send()
            .await?;
        decode(response).await
    }

    /// Ask the backend for an AI reply suggestion for one email.
    #[instrument(skip(self, body), fields(subsystem = "backend", op = "suggest_reply", email_id = %id))]
    pub async fn suggest_reply(&self, id: &str, body: &Value) -> UpstreamResult<Value> {
        let response = self
            .client
            .post(format!("{}/api/emails/{}/suggest-reply", self.base_url, id))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    /// Generate reply variants from a free-form request.
    pub async fn generate_reply(&self, body: &Value) -> UpstreamResult<Value> {
        let response = self
            .client
            .post(format!("{}/api/emails/generate-reply", self.base_url))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// List configured IMAP accounts.
    pub async fn list_accounts(&self) -> UpstreamResult<Value> {
        let response = self
            .client
            .get(format!("{}/api/accounts/list", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    /// Register an IMAP account; the backend validates credentials and
    /// starts a sync task.
    #[instrument(skip(self, body), fields(subsystem = "backend", op = "add_account"))]
    pub async fn add_account(&self, body: &Value) -> UpstreamResult<Value> {
        let response = self
            .client
            .post(format!("{}/api/accounts/add", self.base_url))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    // ========================================================================
    // Stats & knowledge base
    // ========================================================================

    /// Aggregate mailbox counts.
    pub async fn stats(&self) -> UpstreamResult<Value> {
        let response = self
            .client
            .get(format!("{}/api/stats", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    /// List knowledge-base entries.
    pub async fn list_knowledge(&self) -> UpstreamResult<Value> {
        let response = self
            .client
            .get(format!("{}/api/knowledge/list", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    /// Store a knowledge-base entry for reply grounding.
    pub async fn add_knowledge(&self, body: &Value) -> UpstreamResult<Value> {
        let response = self
            .client
            .post(format!("{}/api/knowledge/add", self.base_url))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    // ========================================================================
    // Liveness
    // ========================================================================

    /// Probe the backend's root route.
    pub async fn health_check(&self) -> bool {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .timeout(Duration::from_secs(defaults::HEALTH_TIMEOUT_SECS))
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    debug!("Backend health check passed");
                    true
                } else {
                    warn!("Backend health check failed: {}", resp.status());
                    false
                }
            }
            Err(e) => {
                warn!("Backend health check error: {}", e);
                false
            }
        }
    }

    /// Configured per-request timeout in seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

impl Default for SyncBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a backend response to JSON or the matching [`UpstreamError`].
async fn decode(response: reqwest::Response) -> UpstreamResult<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::Upstream {
            status: status.as_u16(),
            body,
        });
    }
    response
        .json()
        .await
        .map_err(|e| UpstreamError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_query_omits_absent_params() {
        let query = EmailQuery::default();
        assert!(query.params().is_empty());
    }

    #[test]
    fn test_email_query_appends_only_provided_params() {
        let query = EmailQuery {
            account: Some("user@gmail.com".to_string()),
            folder: None,
            category: Some("Interested".to_string()),
            limit: Some(100),
        };
        assert_eq!(
            query.params(),
            vec![
                ("account", "user@gmail.com".to_string()),
                ("category", "Interested".to_string()),
                ("limit", "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let backend = SyncBackend::with_config("http://localhost:8000/".to_string());
        assert_eq!(backend.base_url(), "http://localhost:8000");
    }
}
