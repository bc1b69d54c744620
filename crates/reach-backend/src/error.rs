//! Error type for aggregation backend calls.
//!
//! The proxy's fallback policy depends on *why* a call failed, so the
//! variants keep network-level failure, upstream error responses, and
//! undecodable success bodies apart instead of flattening them into one
//! string.

use thiserror::Error;

/// Result type alias for backend calls.
pub type UpstreamResult<T> = std::result::Result<T, UpstreamError>;

/// Failure modes of a single call to the aggregation backend.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Network-level failure: connection refused, DNS, timeout. The backend
    /// never answered, which is the trigger for mock-mode substitution.
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with a non-2xx status. The proxy passes the
    /// status through, and for the mutating routes the body as well.
    #[error("Backend returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The backend answered 2xx but the body was not valid JSON.
    #[error("Backend response undecodable: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// True when the backend never produced a usable answer, meaning the
    /// documented mock fallback applies.
    pub fn is_unreachable(&self) -> bool {
        !matches!(self, UpstreamError::Upstream { .. })
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        UpstreamError::Unreachable(e.to_string())
    }
}
