//! # reach-api
//!
//! BFF proxy server for the reachinbox dashboard.
//!
//! Every `/api` route forwards to the external aggregation backend at
//! `PYTHON_BACKEND_URL` and propagates its JSON unchanged. When the backend
//! is unreachable the routes answer 200 with the documented mock payloads
//! instead of an error, stamped with the `x-reachinbox-degraded` header so
//! substituted data stays distinguishable from the real thing.
//!
//! The router lives in the library target so integration tests can spawn
//! the full app against a stub backend.

pub mod routes;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use reach_backend::SyncBackend;

use routes::{
    add_account, add_knowledge, generate_reply, get_email, health_check, list_accounts,
    list_emails, list_knowledge, ping, stats, suggest_reply,
};

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically, which is useful for
/// correlating proxy log lines with backend logs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the aggregation backend.
    pub backend: Arc<SyncBackend>,
    /// Payload for `/api/ping` (`PING_MESSAGE` override or the default).
    pub ping_message: String,
}

impl AppState {
    pub fn new(backend: SyncBackend, ping_message: impl Into<String>) -> Self {
        Self {
            backend: Arc::new(backend),
            ping_message: ping_message.into(),
        }
    }

    /// Build state from the environment (`PYTHON_BACKEND_URL`, `PING_MESSAGE`).
    pub fn from_env() -> Self {
        let ping_message = std::env::var("PING_MESSAGE")
            .unwrap_or_else(|_| reach_core::defaults::PING_MESSAGE.to_string());
        Self::new(SyncBackend::from_env(), ping_message)
    }
}

/// Parse allowed origins from a comma-separated environment variable.
///
/// `ALLOWED_ORIGINS` is a comma-separated origin whitelist. Defaults to the
/// local dashboard dev origins when unset or empty.
pub fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| {
        "http://localhost:3000,http://localhost:5173,http://localhost:8080".to_string()
    });

    if origins_str.trim().is_empty() {
        return vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://localhost:8080"),
        ];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

/// Build the proxy router.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Liveness (local + upstream probe)
        .route("/health", get(health_check))
        .route("/api/ping", get(ping))
        // Emails
        .route("/api/emails", get(list_emails))
        .route("/api/emails/generate-reply", post(generate_reply))
        .route("/api/emails/:id", get(get_email))
        .route("/api/emails/:id/suggest-reply", post(suggest_reply))
        // Accounts
        .route("/api/accounts/list", get(list_accounts))
        .route("/api/accounts/add", post(add_account))
        // Stats
        .route("/api/stats", get(stats))
        // Knowledge base
        .route("/api/knowledge/list", get(list_knowledge))
        .route("/api/knowledge/add", post(add_knowledge))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parse_allowed_origins()))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT]),
        )
        .with_state(state)
}
