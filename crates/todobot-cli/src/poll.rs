//! Long-polling gateway.
//!
//! Fetches updates with `getUpdates`, handles them one at a time and
//! advances the offset past each one.  Transport failures back off and
//! retry; the loop only ends on Ctrl+C.

use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use todobot_adapters::{AdapterError, TelegramClient};
use todobot_web::AppState;
use todobot_web::bot::dispatch_update;

const RETRY_DELAY: Duration = Duration::from_secs(5);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Delay before the next attempt after `failures` consecutive failures.
pub fn backoff(failures: u32) -> Duration {
    let factor = 1u32 << failures.saturating_sub(1).min(4);
    (RETRY_DELAY * factor).min(MAX_RETRY_DELAY)
}

/// Poll until interrupted.
pub async fn run(state: AppState, telegram: TelegramClient, poll_timeout: u64) -> Result<()> {
    let mut offset: Option<i64> = None;
    let mut failures: u32 = 0;

    loop {
        let polled = tokio::select! {
            polled = telegram.get_updates(offset, poll_timeout) => polled,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping poller");
                return Ok(());
            }
        };

        let updates = match polled {
            Ok(updates) => {
                failures = 0;
                updates
            }
            Err(e) => {
                failures += 1;
                let delay = backoff(failures);
                if matches!(e, AdapterError::Telegram { error_code: 409, .. }) {
                    warn!("a webhook is registered; run `todobot delete-webhook` to poll");
                }
                warn!(error = %e, retry_in = ?delay, "Telegram poll failed, retrying...");
                tokio::time::sleep(delay).await;
                continue;
            }
        };

        for update in &updates {
            offset = Some(update.update_id + 1);
            dispatch_update(&state, update).await;
        }
    }
}
