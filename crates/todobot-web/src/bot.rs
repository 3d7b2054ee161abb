//! Bot command handling.
//!
//! Transport-agnostic: the webhook and the long-polling loop both hand
//! incoming text to [`handle_text`] and send back whatever it returns.

use tracing::{debug, info, warn};

use todobot_adapters::Update;
use todobot_intent::{BotCommand, classify, parse_command, split_hint};

use crate::state::AppState;

pub const WELCOME: &str =
    "Welcome to the Todoist Bot! Add tasks by sending a message. Use /help for more commands.";

pub const HELP: &str = "Available commands:\n\
    /add <task> - Add a new task\n\
    /complete <task> - Complete a task\n\
    /find <text> - List tasks containing the text\n\
    /help - Show this help message";

const ADD_USAGE: &str = "Please provide a task to add. Usage: /add <task> - <category hint>";
const COMPLETE_USAGE: &str = "Please provide a task to complete. Usage: /complete <task>";
const FIND_USAGE: &str = "Please provide some text to search for. Usage: /find <text>";
const ADD_FAILED: &str = "Failed to add task.";

/// Telegram rejects messages longer than this many UTF-16 code units.
pub const MESSAGE_LIMIT: usize = 4096;

/// Room kept free at the end of a list reply for the overflow line.
const OVERFLOW_RESERVE: usize = 32;

pub const NOT_CONFIGURED: &str =
    "Todoist is not configured. Set TODOIST_API_TOKEN and restart the bot.";

/// Produce the reply to one chat message.
///
/// Returns `None` for plain text and unknown commands, which the bot
/// ignores.
pub async fn handle_text(state: &AppState, text: &str) -> Option<String> {
    let command = parse_command(text)?;
    let reply = match command {
        BotCommand::Start => WELCOME.to_string(),
        BotCommand::Help => HELP.to_string(),
        BotCommand::Add(message) => add(state, &message).await,
        BotCommand::Complete(content) => complete(state, &content).await,
        BotCommand::Find(query) => find(state, &query).await,
        BotCommand::Unknown(name) => {
            debug!(command = %name, "ignoring unknown command");
            return None;
        }
    };
    Some(reply)
}

/// Handle one update and send the reply to its chat.
pub async fn dispatch_update(state: &AppState, update: &Update) {
    let Some((chat_id, text)) = update.text_message() else {
        debug!(update_id = update.update_id, "update carries no text, skipping");
        return;
    };

    let Some(reply) = handle_text(state, text).await else {
        return;
    };

    match &state.telegram {
        Some(telegram) => {
            if let Err(e) = telegram.send_message(chat_id, &reply).await {
                warn!(chat_id, error = %e, "failed to send reply");
            }
        }
        None => debug!(chat_id, reply = %reply, "no Telegram client, reply dropped"),
    }
}

async fn add(state: &AppState, message: &str) -> String {
    info!(message = %message, "received /add");
    if message.is_empty() {
        return ADD_USAGE.to_string();
    }
    let Some(tasks) = &state.tasks else {
        return NOT_CONFIGURED.to_string();
    };

    let request = split_hint(message);
    let mapping = state.mapping().await;
    let classification = classify(&request.hint, &mapping);
    info!(
        content = %request.content,
        hint = %request.hint,
        project = %classification.project,
        section = ?classification.section,
        "classified task"
    );

    match tasks.create_task(&classification.into_draft(request.content)).await {
        Some(task) => format!("Task '{}' added successfully!", task.content),
        None => ADD_FAILED.to_string(),
    }
}

async fn complete(state: &AppState, content: &str) -> String {
    info!(content = %content, "received /complete");
    if content.is_empty() {
        return COMPLETE_USAGE.to_string();
    }
    let Some(tasks) = &state.tasks else {
        return NOT_CONFIGURED.to_string();
    };

    let Some(task) = tasks.find_task_by_content(content).await else {
        warn!(content = %content, "task not found for completion");
        return format!("Task '{content}' not found.");
    };

    if tasks.complete_task(&task.id).await {
        format!("Task '{}' completed!", task.content)
    } else {
        format!("Failed to complete task '{}'.", task.content)
    }
}

async fn find(state: &AppState, query: &str) -> String {
    if query.is_empty() {
        return FIND_USAGE.to_string();
    }
    let Some(tasks) = &state.tasks else {
        return NOT_CONFIGURED.to_string();
    };

    let found = tasks.find_tasks_by_name(query).await;
    if found.is_empty() {
        return format!("No tasks matching '{query}'.");
    }

    let mut reply = format!("Found {} task(s):", found.len());
    let budget = MESSAGE_LIMIT - OVERFLOW_RESERVE;
    let mut used = utf16_len(&reply);
    let mut shown = 0;
    for task in &found {
        let line = format!("\n- {}", task.content);
        let len = utf16_len(&line);
        if used + len > budget {
            break;
        }
        reply.push_str(&line);
        used += len;
        shown += 1;
    }
    if shown < found.len() {
        debug!(shown, total = found.len(), "find reply truncated");
        reply.push_str(&format!("\n…and {} more", found.len() - shown));
    }
    reply
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}
