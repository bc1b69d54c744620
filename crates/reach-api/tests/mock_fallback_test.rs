//! Integration tests for mock-mode fallback: every route must answer 200
//! with its documented fixed payload when the aggregation backend is
//! unreachable, stamped with the degraded-service header.

use serde_json::{json, Value};

use reach_api::AppState;
use reach_backend::SyncBackend;
use reach_core::defaults;

/// An address nothing is listening on.
fn dead_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

/// Spawn the proxy against a dead backend.
async fn spawn_degraded_proxy() -> String {
    let state = AppState::new(SyncBackend::with_config(dead_endpoint()), "ping");
    let app = reach_api::app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn assert_degraded(response: &reqwest::Response) {
    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get(defaults::DEGRADED_HEADER)
            .and_then(|v| v.to_str().ok()),
        Some(defaults::DEGRADED_UNREACHABLE)
    );
}

#[tokio::test]
async fn test_emails_fall_back_to_the_three_fixture_emails() {
    let base_url = spawn_degraded_proxy().await;

    let response = reqwest::get(format!("{}/api/emails?limit=100", base_url))
        .await
        .unwrap();
    assert_degraded(&response);

    let emails: Vec<Value> = response.json().await.unwrap();
    assert_eq!(emails.len(), 3);
    assert_eq!(
        emails.iter().map(|e| e["id"].as_str().unwrap()).collect::<Vec<_>>(),
        vec!["1", "2", "3"]
    );
    assert_eq!(
        emails
            .iter()
            .map(|e| e["ai_category"].as_str().unwrap())
            .collect::<Vec<_>>(),
        vec!["Interested", "Meeting Booked", "Not Interested"]
    );
}

#[tokio::test]
async fn test_single_email_falls_back_echoing_the_id() {
    let base_url = spawn_degraded_proxy().await;

    let response = reqwest::get(format!("{}/api/emails/e-404", base_url))
        .await
        .unwrap();
    assert_degraded(&response);

    let email: Value = response.json().await.unwrap();
    assert_eq!(email["id"], "e-404");
    assert_eq!(email["ai_category"], "Interested");
}

#[tokio::test]
async fn test_suggest_reply_falls_back_with_variants() {
    let base_url = spawn_degraded_proxy().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/emails/7/suggest-reply", base_url))
        .send()
        .await
        .unwrap();
    assert_degraded(&response);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email_id"], "7");
    assert!(body["suggested_reply"].as_str().unwrap().starts_with("Thank you"));
    for key in ["short", "medium", "detailed"] {
        assert!(body["variants"][key].is_string(), "missing variant {}", key);
    }
}

#[tokio::test]
async fn test_generate_reply_falls_back_with_success_envelope() {
    let base_url = spawn_degraded_proxy().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/emails/generate-reply", base_url))
        .json(&json!({ "incoming_email": "hi", "user_name": "Sam" }))
        .send()
        .await
        .unwrap();
    assert_degraded(&response);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["variants"]["short"], "Thank you for your email.");
}

#[tokio::test]
async fn test_accounts_list_falls_back_to_one_account() {
    let base_url = spawn_degraded_proxy().await;

    let response = reqwest::get(format!("{}/api/accounts/list", base_url))
        .await
        .unwrap();
    assert_degraded(&response);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["accounts"].as_array().unwrap().len(), 1);
    assert_eq!(body["accounts"][0]["email"], "user@gmail.com");
    assert_eq!(body["accounts"][0]["server"], "imap.gmail.com");
    assert_eq!(body["accounts"][0]["port"], 993);
    assert_eq!(body["active_syncs"], json!([]));
}

#[tokio::test]
async fn test_add_account_falls_back_to_mock_success() {
    let base_url = spawn_degraded_proxy().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/accounts/add", base_url))
        .json(&json!({ "email": "me@example.com", "password": "pw" }))
        .send()
        .await
        .unwrap();
    assert_degraded(&response);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["message"],
        "Account me@example.com added successfully (mock mode)"
    );
    assert_eq!(body["account"], "me@example.com");
}

#[tokio::test]
async fn test_stats_fall_back_to_fixture_counts() {
    let base_url = spawn_degraded_proxy().await;

    let response = reqwest::get(format!("{}/api/stats", base_url)).await.unwrap();
    assert_degraded(&response);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["total_emails"], 3);
    assert_eq!(body["categories"]["Interested"], 1);
    assert_eq!(body["categories"]["Meeting Booked"], 1);
    assert_eq!(body["categories"]["Not Interested"], 1);
    assert_eq!(body["categories"]["Spam"], 0);
    assert_eq!(body["categories"]["Out of Office"], 0);
    assert_eq!(body["accounts_configured"], 1);
}

#[tokio::test]
async fn test_knowledge_list_falls_back_to_empty() {
    let base_url = spawn_degraded_proxy().await;

    let response = reqwest::get(format!("{}/api/knowledge/list", base_url))
        .await
        .unwrap();
    assert_degraded(&response);

    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "knowledge": [], "count": 0 })
    );
}

#[tokio::test]
async fn test_add_knowledge_falls_back_with_random_id() {
    let base_url = spawn_degraded_proxy().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/knowledge/add", base_url))
        .json(&json!({ "content": "we sell rust crates", "metadata": {} }))
        .send()
        .await
        .unwrap();
    assert_degraded(&response);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Knowledge added to vector database (mock mode)");
    assert_eq!(body["id"].as_str().unwrap().len(), 7);
}

#[tokio::test]
async fn test_health_reports_unreachable_upstream() {
    let base_url = spawn_degraded_proxy().await;

    let body: Value = reqwest::get(format!("{}/health", base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["upstream"], "unreachable");
}
