//! todobot intent layer.
//!
//! Turns chat text into something the kernel can act on:
//!
//! - **[`command`]** -- slash-command parsing and the `/add` hint separator.
//! - **[`mapping`]** -- the ordered project/section keyword mapping.
//! - **[`classifier`]** -- two-pass keyword classification.
//! - **[`extract`]** -- prompt and answer parsing for model-based extraction.
//! - **[`error`]** -- [`IntentError`] via [`thiserror`].

pub mod classifier;
pub mod command;
pub mod error;
pub mod extract;
pub mod mapping;

pub use classifier::{Classification, DEFAULT_PROJECT, DEFAULT_SECTION, classify};
pub use command::{AddRequest, BotCommand, HINT_SEPARATOR, parse_command, split_hint};
pub use error::{IntentError, Result};
pub use extract::{ExtractedTask, TaskExtractor, parse_extraction, system_prompt};
pub use mapping::{MappingConfig, ProjectEntry};

