//! End-to-end tests for the webhook server.
//!
//! These tests spin up the **real** Axum router on an OS-assigned ephemeral
//! port and make actual HTTP requests via `reqwest`.  Replies go to a mock
//! Telegram Bot API.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use todobot_adapters::{SECRET_TOKEN_HEADER, TelegramClient};
use todobot_kernel::TaskManager;
use todobot_web::{AppState, WebConfig, WebServer};

use common::{MemoryTodoist, mapping};

const SECRET: &str = "hook-secret";
const BOT_TOKEN: &str = "42:test";

// ── helpers ──────────────────────────────────────────────────────────────────

/// Bind to 127.0.0.1:0, serve the router, return the base URL.
async fn start_test_server(state: AppState) -> String {
    let server = WebServer::new(WebConfig::default(), state);
    let app = server.router();

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind to port 0");
    let addr: SocketAddr = listener.local_addr().expect("get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    // Small yield so the listener is ready.
    tokio::time::sleep(Duration::from_millis(10)).await;

    format!("http://127.0.0.1:{}", addr.port())
}

fn update(text: &str) -> serde_json::Value {
    json!({
        "update_id": 1001,
        "message": {
            "message_id": 7,
            "date": 1700000000,
            "chat": { "id": 555, "type": "private" },
            "from": { "id": 9, "is_bot": false, "first_name": "Sam" },
            "text": text
        }
    })
}

/// Wait until the mock Telegram server has seen `count` requests.
async fn wait_for_requests(telegram: &MockServer, count: usize) {
    for _ in 0..100 {
        let seen = telegram.received_requests().await.unwrap_or_default().len();
        if seen >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Telegram mock did not receive {count} request(s)");
}

// ── GET /health ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
    let base = start_test_server(AppState::new(mapping())).await;

    let resp = reqwest::get(format!("{base}/health")).await.expect("request failed");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("invalid JSON");
    assert_eq!(body, json!({ "status": "ok" }));
}

// ── POST /webhook ────────────────────────────────────────────────────────────

#[tokio::test]
async fn wrong_secret_is_forbidden() {
    let state = AppState::new(mapping()).with_webhook_secret(SECRET);
    let base = start_test_server(state).await;
    let client = reqwest::Client::new();

    let missing = client
        .post(format!("{base}/webhook"))
        .json(&update("/start"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(missing.status(), 403);

    let wrong = client
        .post(format!("{base}/webhook"))
        .header(SECRET_TOKEN_HEADER, "nope")
        .json(&update("/start"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(wrong.status(), 403);
}

#[tokio::test]
async fn malformed_update_is_acknowledged() {
    let base = start_test_server(AppState::new(mapping())).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/webhook"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn get_on_webhook_is_not_allowed() {
    let base = start_test_server(AppState::new(mapping())).await;
    let resp = reqwest::get(format!("{base}/webhook")).await.expect("request failed");
    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn add_command_creates_task_and_replies() {
    let telegram = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{BOT_TOKEN}/sendMessage")))
        .and(body_json(json!({
            "chat_id": 555,
            "text": "Task 'Fix the pump' added successfully!"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {
                "message_id": 8,
                "chat": { "id": 555, "type": "private" },
                "text": "Task 'Fix the pump' added successfully!"
            }
        })))
        .expect(1)
        .mount(&telegram)
        .await;

    let service = Arc::new(
        MemoryTodoist::new()
            .project("p1", "Ai Automations 🤖💻")
            .section("s1", "Farming-guide 🌾", "p1"),
    );
    let state = AppState::new(mapping())
        .with_tasks(Arc::new(TaskManager::new(service.clone())))
        .with_telegram(TelegramClient::new(BOT_TOKEN).with_api_base(telegram.uri()))
        .with_webhook_secret(SECRET);
    let base = start_test_server(state).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/webhook"))
        .header(SECRET_TOKEN_HEADER, SECRET)
        .json(&update("/add Fix the pump - farming guide"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);

    wait_for_requests(&telegram, 1).await;

    let task = service.task_by_content("Fix the pump").unwrap();
    assert_eq!(task.section_id.as_deref(), Some("s1"));
}
