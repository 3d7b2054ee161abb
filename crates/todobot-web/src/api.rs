//! HTTP handlers.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, warn};

use todobot_adapters::{SECRET_TOKEN_HEADER, Update};

use crate::bot;
use crate::state::AppState;

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /webhook`
///
/// Acknowledges the update at once and handles it on its own task.
/// Undecodable updates are acknowledged too, so Telegram stops redelivering
/// them.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(expected) = &state.webhook_secret {
        let given = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if given != Some(expected.as_str()) {
            warn!("rejected webhook call with missing or wrong secret token");
            return StatusCode::FORBIDDEN;
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "ignoring malformed update");
            return StatusCode::OK;
        }
    };

    debug!(update_id = update.update_id, "webhook received");
    tokio::spawn(async move {
        bot::dispatch_update(&state, &update).await;
    });

    StatusCode::OK
}
