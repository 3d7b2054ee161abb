//! Telegram client tests against a mock Bot API.

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use todobot_adapters::{AdapterError, TelegramClient};

const TOKEN: &str = "123:abc";

async fn setup() -> (MockServer, TelegramClient) {
    let server = MockServer::start().await;
    let client = TelegramClient::new(TOKEN).with_api_base(server.uri());
    (server, client)
}

fn envelope(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": result }))
}

#[tokio::test]
async fn get_me_decodes_user() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getMe")))
        .respond_with(envelope(json!({
            "id": 99,
            "is_bot": true,
            "first_name": "Todo",
            "username": "todo_bot"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let me = client.get_me().await.unwrap();
    assert!(me.is_bot);
    assert_eq!(me.username.as_deref(), Some("todo_bot"));
}

#[tokio::test]
async fn send_message_posts_chat_and_text() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_json(json!({ "chat_id": 42, "text": "Task 'x' added successfully!" })))
        .respond_with(envelope(json!({
            "message_id": 5,
            "date": 1700000000,
            "chat": { "id": 42, "type": "private" },
            "text": "Task 'x' added successfully!"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sent = client
        .send_message(42, "Task 'x' added successfully!")
        .await
        .unwrap();
    assert_eq!(sent.chat.id, 42);
}

#[tokio::test]
async fn get_updates_sends_offset_and_timeout() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .and(body_partial_json(json!({ "offset": 11, "timeout": 0 })))
        .respond_with(envelope(json!([
            {
                "update_id": 11,
                "message": {
                    "message_id": 1,
                    "chat": { "id": 42, "type": "private" },
                    "text": "/help"
                }
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let updates = client.get_updates(Some(11), 0).await.unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].text_message(), Some((42, "/help")));
}

#[tokio::test]
async fn set_webhook_passes_secret() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/setWebhook")))
        .and(body_partial_json(json!({
            "url": "https://bot.example.com/webhook",
            "secret_token": "s3cret"
        })))
        .respond_with(envelope(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let ok = client
        .set_webhook("https://bot.example.com/webhook", Some("s3cret"))
        .await
        .unwrap();
    assert!(ok);
}

#[tokio::test]
async fn delete_webhook() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/deleteWebhook")))
        .respond_with(envelope(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.delete_webhook().await.unwrap());
}

#[tokio::test]
async fn api_errors_surface_description() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let err = client.send_message(1, "hi").await.unwrap_err();
    match err {
        AdapterError::Telegram {
            error_code,
            description,
            ..
        } => {
            assert_eq!(error_code, 400);
            assert!(description.contains("chat not found"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_api_hides_token() {
    let client = TelegramClient::new(TOKEN).with_api_base("http://127.0.0.1:1");
    let err = client.get_me().await.unwrap_err();
    assert!(matches!(err, AdapterError::Request { .. }));
    assert!(!err.to_string().contains(TOKEN));
}
