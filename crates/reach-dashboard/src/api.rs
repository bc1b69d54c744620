//! Blocking HTTP client for the BFF proxy.
//!
//! The event loop drives these calls directly, so they block; the proxy
//! answers fast (or substitutes mock data) and the terminal follows the
//! pack convention of blocking fetches between frames.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use reach_core::{
    defaults, AccountList, AddAccountRequest, Email, Error, MailboxStats, ReplySuggestion,
    Result, StatusResponse,
};

/// Timeout for dashboard requests (seconds). Short: a stalled proxy should
/// surface as a status-line error, not a frozen UI.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client for the dashboard-facing `/api` surface.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Client for a specific proxy base URL.
    pub fn with_config(base_url: String) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment variables (`REACH_API_URL`).
    pub fn from_env() -> Self {
        let base_url = std::env::var("REACH_API_URL")
            .unwrap_or_else(|_| defaults::DASHBOARD_API_URL.to_string());
        Self::with_config(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the email list. Accepts both wire shapes the backend has
    /// used: a bare array or `{"emails": [...]}`.
    pub fn list_emails(&self, limit: u32) -> Result<Vec<Email>> {
        let response = self
            .http
            .get(format!("{}/api/emails", self.base_url))
            .query(&[("limit", limit.to_string())])
            .send()?;
        let value: Value = expect_json(response)?;
        let emails = match value {
            Value::Array(_) => value,
            Value::Object(mut map) => map.remove("emails").unwrap_or(Value::Array(vec![])),
            _ => Value::Array(vec![]),
        };
        debug!(result_count = emails.as_array().map(|a| a.len()).unwrap_or(0), "Emails fetched");
        Ok(serde_json::from_value(emails)?)
    }

    /// Fetch configured accounts.
    pub fn accounts(&self) -> Result<AccountList> {
        let response = self
            .http
            .get(format!("{}/api/accounts/list", self.base_url))
            .send()?;
        expect_json(response)
    }

    /// Fetch aggregate mailbox counts.
    pub fn stats(&self) -> Result<MailboxStats> {
        let response = self
            .http
            .get(format!("{}/api/stats", self.base_url))
            .send()?;
        expect_json(response)
    }

    /// Request an AI reply suggestion for one email.
    pub fn suggest_reply(&self, email_id: &str) -> Result<ReplySuggestion> {
        let response = self
            .http
            .post(format!(
                "{}/api/emails/{}/suggest-reply",
                self.base_url, email_id
            ))
            .send()?;
        expect_json(response)
    }

    /// Register an IMAP account.
    pub fn add_account(&self, request: &AddAccountRequest) -> Result<StatusResponse> {
        let response = self
            .http
            .post(format!("{}/api/accounts/add", self.base_url))
            .json(request)
            .send()?;
        expect_json(response)
    }

    /// Store a knowledge-base entry.
    pub fn add_knowledge(&self, content: &str, metadata: Value) -> Result<StatusResponse> {
        let response = self
            .http
            .post(format!("{}/api/knowledge/add", self.base_url))
            .json(&serde_json::json!({ "content": content, "metadata": metadata }))
            .send()?;
        expect_json(response)
    }
}

/// Decode a 2xx response, or surface the proxy's `{"detail": ...}` as the
/// error message (the toast copy).
fn expect_json<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<Value>()
            .ok()
            .and_then(|v| v["detail"].as_str().map(String::from))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        return Err(Error::Request(detail));
    }
    Ok(response.json()?)
}
