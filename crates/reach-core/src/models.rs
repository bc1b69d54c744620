//! Core data models for reachinbox.
//!
//! These are the JSON records exchanged between the dashboard, the BFF
//! proxy, and the aggregation backend. The proxy itself forwards upstream
//! payloads as raw JSON so unknown fields survive untouched; the typed
//! models here serve the dashboard and the mock-mode catalog. Date-ish
//! fields stay strings on the wire because the backend emits a mix of
//! RFC 3339 timestamps and raw email header dates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::defaults;

// =============================================================================
// CATEGORIES
// =============================================================================

/// The closed set of AI-assigned email categories.
///
/// Wire strings are fixed; anything outside this set is treated as
/// uncategorized by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Interested,
    #[serde(rename = "Meeting Booked")]
    MeetingBooked,
    #[serde(rename = "Not Interested")]
    NotInterested,
    Spam,
    #[serde(rename = "Out of Office")]
    OutOfOffice,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 5] = [
        Category::Interested,
        Category::MeetingBooked,
        Category::NotInterested,
        Category::Spam,
        Category::OutOfOffice,
    ];

    /// The exact wire string for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Interested => "Interested",
            Category::MeetingBooked => "Meeting Booked",
            Category::NotInterested => "Not Interested",
            Category::Spam => "Spam",
            Category::OutOfOffice => "Out of Office",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown category: {}", s)))
    }
}

// =============================================================================
// EMAILS
// =============================================================================

/// A synchronized email as served by the aggregation backend.
///
/// Unknown wire fields are ignored on deserialization (the backend attaches
/// extra bookkeeping the dashboard never reads).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub body: String,
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_reply: Option<String>,
}

impl Email {
    /// The email's category, if `ai_category` is one of the closed set.
    pub fn category(&self) -> Option<Category> {
        self.ai_category.as_deref().and_then(|s| s.parse().ok())
    }
}

// =============================================================================
// ACCOUNTS
// =============================================================================

/// A configured IMAP account (password never round-trips).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

/// Response shape of `GET /api/accounts/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountList {
    pub accounts: Vec<Account>,
    /// Accounts with a live sync task on the backend.
    #[serde(default)]
    pub active_syncs: Vec<String>,
}

/// Request body for `POST /api/accounts/add`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAccountRequest {
    pub email: String,
    pub password: String,
    #[serde(default = "default_imap_server")]
    pub server: String,
    #[serde(default = "default_imap_port")]
    pub port: u16,
}

fn default_imap_server() -> String {
    defaults::IMAP_SERVER.to_string()
}

fn default_imap_port() -> u16 {
    defaults::IMAP_PORT
}

// =============================================================================
// STATS
// =============================================================================

/// Aggregate mailbox counts from `GET /api/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailboxStats {
    pub total_emails: u64,
    /// Category name → email count, keyed by the closed category set.
    pub categories: HashMap<String, u64>,
    pub accounts_configured: u64,
    #[serde(default)]
    pub active_syncs: u64,
}

impl MailboxStats {
    /// Count for one category (absent keys count as zero).
    pub fn count_for(&self, category: Category) -> u64 {
        self.categories.get(category.as_str()).copied().unwrap_or(0)
    }
}

// =============================================================================
// KNOWLEDGE BASE
// =============================================================================

/// A knowledge-base entry used by the backend to ground reply generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    #[serde(default = "empty_metadata")]
    pub metadata: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

fn empty_metadata() -> JsonValue {
    JsonValue::Object(serde_json::Map::new())
}

/// Response shape of `GET /api/knowledge/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeList {
    pub knowledge: Vec<KnowledgeEntry>,
    pub count: usize,
}

// =============================================================================
// REPLY GENERATION
// =============================================================================

/// The three reply lengths the backend generates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyVariants {
    pub short: String,
    pub medium: String,
    pub detailed: String,
}

/// Response shape of `POST /api/emails/:id/suggest-reply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplySuggestion {
    pub email_id: String,
    pub suggested_reply: String,
    pub variants: ReplyVariants,
}

/// Request body for `POST /api/emails/generate-reply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReplyRequest {
    pub incoming_email: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_link: Option<String>,
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_tone() -> String {
    "professional".to_string()
}

// =============================================================================
// GENERIC RESPONSES
// =============================================================================

/// Status/message envelope returned by the mutating routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

// =============================================================================
// SESSION
// =============================================================================

/// The demo login session held by the dashboard.
///
/// Explicitly not a security boundary: any syntactically valid email and
/// non-empty password mint one, and nothing validates it server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}
