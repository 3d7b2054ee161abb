//! Bot command parsing.
//!
//! Commands arrive as chat text such as `/add Fix the pump - farming guide`.
//! The command word may carry a `@botname` suffix, and its arguments are
//! whitespace-split and re-joined with single spaces.

/// Separator between task content and classification hint in `/add`.
pub const HINT_SEPARATOR: &str = " - ";

/// A parsed bot command.  Arguments may be empty; the handler decides how
/// to answer that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    /// `/add <task> [- <hint>]`
    Add(String),
    /// `/complete <task>`
    Complete(String),
    /// `/find <text>`
    Find(String),
    /// Any other slash command, by name.
    Unknown(String),
}

/// Parse a chat message as a command.  Returns `None` for text that does not
/// start with `/`.
pub fn parse_command(text: &str) -> Option<BotCommand> {
    let mut words = text.split_whitespace();
    let head = words.next()?.strip_prefix('/')?;
    let name = head.split('@').next().unwrap_or(head).to_lowercase();
    let args = words.collect::<Vec<_>>().join(" ");

    let command = match name.as_str() {
        "start" => BotCommand::Start,
        "help" => BotCommand::Help,
        "add" => BotCommand::Add(args),
        "complete" => BotCommand::Complete(args),
        "find" => BotCommand::Find(args),
        _ => BotCommand::Unknown(name),
    };
    Some(command)
}

/// `/add` arguments split into what gets stored and what gets classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    /// The task content sent to the service.
    pub content: String,
    /// The text fed to the classifier.
    pub hint: String,
}

/// Split `/add` arguments on the first [`HINT_SEPARATOR`].
///
/// Without a separator the whole message is both content and hint.
pub fn split_hint(message: &str) -> AddRequest {
    match message.split_once(HINT_SEPARATOR) {
        Some((content, hint)) => AddRequest {
            content: content.trim().to_string(),
            hint: hint.trim().to_string(),
        },
        None => AddRequest {
            content: message.to_string(),
            hint: message.to_string(),
        },
    }
}
