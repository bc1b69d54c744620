//! Proxy route handlers.
//!
//! Contract per route:
//! - 2xx upstream JSON passes through unchanged.
//! - Non-2xx upstream responses keep their status; the body becomes a
//!   generic `{"detail": ...}` except on the two add routes, which forward
//!   the upstream's own error body.
//! - An unreachable (or undecodable) backend yields 200 with the fixed
//!   mock payload for the route, stamped with the degraded-service header.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use reach_backend::mock;
use reach_backend::{EmailQuery, UpstreamError, UpstreamResult};
use reach_core::defaults;

use crate::AppState;

// =============================================================================
// LIVENESS
// =============================================================================

/// `GET /api/ping`: answered locally, never proxied.
pub async fn ping(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "message": state.ping_message }))
}

/// `GET /health`: proxy liveness plus an upstream reachability probe.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let upstream = if state.backend.health_check().await {
        "ok"
    } else {
        "unreachable"
    };
    Json(json!({
        "status": "ok",
        "service": "reach-api",
        "version": env!("CARGO_PKG_VERSION"),
        "upstream": upstream,
    }))
}

// =============================================================================
// EMAILS
// =============================================================================

/// `GET /api/emails`: forwards exactly the provided filters.
pub async fn list_emails(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Response {
    let result = state.backend.list_emails(&query).await;
    finish("emails", result, "Failed to fetch emails", mock::email_list)
}

/// `GET /api/emails/:id`
pub async fn get_email(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = state.backend.get_email(&id).await;
    finish("email", result, "Email not found", || mock::email(&id))
}

/// `POST /api/emails/:id/suggest-reply`
pub async fn suggest_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    let body = into_body(body);
    let result = state.backend.suggest_reply(&id, &body).await;
    finish("suggest-reply", result, "Failed to generate reply", || {
        mock::reply_suggestion(&id)
    })
}

/// `POST /api/emails/generate-reply`
pub async fn generate_reply(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Response {
    let body = into_body(body);
    let result = state.backend.generate_reply(&body).await;
    finish(
        "generate-reply",
        result,
        "Failed to generate reply",
        mock::generated_reply,
    )
}

// =============================================================================
// ACCOUNTS
// =============================================================================

/// `GET /api/accounts/list`
pub async fn list_accounts(State(state): State<AppState>) -> Response {
    let result = state.backend.list_accounts().await;
    finish(
        "accounts",
        result,
        "Failed to fetch accounts",
        mock::account_list,
    )
}

/// `POST /api/accounts/add`: upstream errors forward their own body.
pub async fn add_account(State(state): State<AppState>, body: Option<Json<Value>>) -> Response {
    let body = into_body(body);
    let submitted = body["email"].as_str().unwrap_or_default().to_string();
    let result = state.backend.add_account(&body).await;
    finish_forwarding_error("add-account", result, move || {
        mock::account_added(&submitted)
    })
}

// =============================================================================
// STATS & KNOWLEDGE BASE
// =============================================================================

/// `GET /api/stats`
pub async fn stats(State(state): State<AppState>) -> Response {
    let result = state.backend.stats().await;
    finish("stats", result, "Failed to fetch stats", mock::stats)
}

/// `GET /api/knowledge/list`
pub async fn list_knowledge(State(state): State<AppState>) -> Response {
    let result = state.backend.list_knowledge().await;
    finish(
        "knowledge",
        result,
        "Failed to fetch knowledge",
        mock::knowledge_list,
    )
}

/// `POST /api/knowledge/add`: upstream errors forward their own body.
pub async fn add_knowledge(State(state): State<AppState>, body: Option<Json<Value>>) -> Response {
    let body = into_body(body);
    let result = state.backend.add_knowledge(&body).await;
    finish_forwarding_error("add-knowledge", result, mock::knowledge_added)
}

// =============================================================================
// RESPONSE MAPPING
// =============================================================================

/// A missing or unparsable request body forwards as `{}`.
fn into_body(body: Option<Json<Value>>) -> Value {
    body.map(|Json(v)| v).unwrap_or_else(|| json!({}))
}

/// Map an upstream result for the read routes: generic `{detail}` on
/// upstream errors, mock payload when the backend never answered.
fn finish<T, F>(
    route: &'static str,
    result: UpstreamResult<Value>,
    detail: &'static str,
    fallback: F,
) -> Response
where
    T: Serialize,
    F: FnOnce() -> T,
{
    match result {
        Ok(value) => {
            debug!(route, "Proxied upstream response");
            Json(value).into_response()
        }
        Err(UpstreamError::Upstream { status, .. }) => {
            debug!(route, upstream_status = status, "Upstream error passed through");
            (status_code(status), Json(json!({ "detail": detail }))).into_response()
        }
        Err(e) => mock_substitute(route, e, fallback),
    }
}

/// Map an upstream result for the mutating routes, which forward the
/// upstream's own error body. A non-JSON error body cannot be forwarded
/// and degrades to the mock substitution.
fn finish_forwarding_error<T, F>(
    route: &'static str,
    result: UpstreamResult<Value>,
    fallback: F,
) -> Response
where
    T: Serialize,
    F: FnOnce() -> T,
{
    match result {
        Ok(value) => {
            debug!(route, "Proxied upstream response");
            Json(value).into_response()
        }
        Err(UpstreamError::Upstream { status, body }) => {
            match serde_json::from_str::<Value>(&body) {
                Ok(error_body) => {
                    debug!(route, upstream_status = status, "Upstream error body forwarded");
                    (status_code(status), Json(error_body)).into_response()
                }
                Err(e) => mock_substitute(route, UpstreamError::Decode(e.to_string()), fallback),
            }
        }
        Err(e) => mock_substitute(route, e, fallback),
    }
}

/// Serve the mock payload with 200 and the degraded-service marker.
fn mock_substitute<T, F>(route: &'static str, cause: UpstreamError, fallback: F) -> Response
where
    T: Serialize,
    F: FnOnce() -> T,
{
    warn!(route, error = %cause, "Backend unavailable, serving mock payload");
    let mut response = Json(fallback()).into_response();
    response.headers_mut().insert(
        HeaderName::from_static(defaults::DEGRADED_HEADER),
        HeaderValue::from_static(defaults::DEGRADED_UNREACHABLE),
    );
    response
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}
