//! Centralized default constants for reachinbox.
//!
//! **This module is the single source of truth** for shared default values.
//! The proxy and the dashboard reference these constants instead of defining
//! their own magic numbers.

// =============================================================================
// UPSTREAM AGGREGATION BACKEND
// =============================================================================

/// Base URL of the external aggregation backend (`PYTHON_BACKEND_URL`).
pub const BACKEND_URL: &str = "http://localhost:8000";

/// Timeout for requests to the aggregation backend (seconds).
pub const BACKEND_TIMEOUT_SECS: u64 = 30;

/// Timeout for the upstream liveness probe (seconds).
pub const HEALTH_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// BFF PROXY
// =============================================================================

/// Bind host for the proxy server.
pub const API_HOST: &str = "0.0.0.0";

/// Bind port for the proxy server.
pub const API_PORT: u16 = 3000;

/// Payload for `/api/ping` when `PING_MESSAGE` is unset.
pub const PING_MESSAGE: &str = "ping";

/// Response header stamped on mock-fallback responses when the upstream is
/// unreachable. Lets clients tell substituted data from the real thing.
pub const DEGRADED_HEADER: &str = "x-reachinbox-degraded";

/// Value of [`DEGRADED_HEADER`] when the aggregation backend is down.
pub const DEGRADED_UNREACHABLE: &str = "upstream-unreachable";

// =============================================================================
// DASHBOARD
// =============================================================================

/// Base URL the dashboard uses to reach the proxy.
pub const DASHBOARD_API_URL: &str = "http://localhost:3000";

/// Email page size requested by the dashboard.
pub const EMAIL_FETCH_LIMIT: u32 = 100;

/// Seconds between automatic email refreshes while the dashboard is open.
pub const POLL_INTERVAL_SECS: u64 = 30;

/// Delay before re-fetching emails after an account is added, giving the
/// backend time to run its first sync pass (seconds).
pub const POST_ACCOUNT_REFRESH_SECS: u64 = 5;

/// Pre-filled IMAP server in the add-account form.
pub const IMAP_SERVER: &str = "imap.gmail.com";

/// Pre-filled IMAP port in the add-account form.
pub const IMAP_PORT: u16 = 993;

/// Directory (under the user config dir) holding dashboard state.
pub const CONFIG_DIR: &str = "reachinbox";

/// Session file name inside [`CONFIG_DIR`].
pub const SESSION_FILE: &str = "session.json";
