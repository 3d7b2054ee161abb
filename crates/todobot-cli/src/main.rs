//! CLI entry point for todobot.
//!
//! This binary provides the `todobot` command with subcommands for running
//! the bot (webhook or long polling), managing the webhook and trying the
//! classifier and extractor offline.

mod cli;
mod config;
mod helpers;
mod poll;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use todobot_intent::{TaskExtractor, classify, split_hint};
use todobot_web::{WebServer, spawn_mapping_watcher};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::helpers::{
    OPENAI_KEY_VAR, TELEGRAM_TOKEN_VAR, TODOIST_TOKEN_VAR, WEBHOOK_SECRET_VAR, build_state,
    env_non_empty, extractor, init_tracing, telegram_client,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing("info");

    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Serve { bind, port } => cmd_serve(config, bind, port).await,
        Commands::Poll { timeout } => cmd_poll(config, timeout).await,
        Commands::SetWebhook { url } => cmd_set_webhook(&config, &url).await,
        Commands::DeleteWebhook => cmd_delete_webhook(&config).await,
        Commands::Classify { text } => cmd_classify(&config, &text.join(" ")),
        Commands::Extract { text } => cmd_extract(&config, &text.join(" ")).await,
        Commands::Status => cmd_status(&config),
    }
}

// ---------------------------------------------------------------------------
// Running the bot
// ---------------------------------------------------------------------------

async fn cmd_serve(mut config: AppConfig, bind: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(bind) = bind {
        config.web.bind = bind;
    }
    if let Some(port) = port {
        config.web.port = port;
    }

    let telegram = telegram_client(&config)?;
    let state = build_state(&config, telegram);

    WebServer::new(config.web_config(), state)
        .with_mapping_path(&config.mappings.path)
        .start()
        .await
        .context("webhook server failed")
}

async fn cmd_poll(config: AppConfig, timeout: Option<u64>) -> Result<()> {
    let telegram = telegram_client(&config)?;
    let me = telegram
        .get_me()
        .await
        .context("failed to reach Telegram, check TELEGRAM_BOT_TOKEN")?;
    let bot_name = me.username.unwrap_or(me.first_name);

    let state = build_state(&config, telegram.clone());
    spawn_mapping_watcher(config.mappings.path.clone(), state.mapping.clone());

    let poll_timeout = timeout.unwrap_or(config.telegram.poll_timeout);

    println!();
    println!("  todobot v{}", env!("CARGO_PKG_VERSION"));
    println!("  Bot: @{bot_name}");
    println!("  Mapping: {}", config.mappings.path.display());
    println!("  Long-poll timeout: {poll_timeout}s");
    println!();
    println!("  Press Ctrl+C to stop.");
    println!();

    info!(bot = %bot_name, "polling for updates");
    poll::run(state, telegram, poll_timeout).await
}

// ---------------------------------------------------------------------------
// Webhook management
// ---------------------------------------------------------------------------

async fn cmd_set_webhook(config: &AppConfig, url: &str) -> Result<()> {
    let telegram = telegram_client(config)?;
    let secret = env_non_empty(WEBHOOK_SECRET_VAR);
    telegram
        .set_webhook(url, secret.as_deref())
        .await
        .context("setWebhook failed")?;
    println!("Webhook set to {url}");
    if secret.is_none() {
        println!("Warning: {WEBHOOK_SECRET_VAR} is not set, anyone can post updates.");
    }
    Ok(())
}

async fn cmd_delete_webhook(config: &AppConfig) -> Result<()> {
    let telegram = telegram_client(config)?;
    telegram
        .delete_webhook()
        .await
        .context("deleteWebhook failed")?;
    println!("Webhook removed");
    Ok(())
}

// ---------------------------------------------------------------------------
// Offline tools
// ---------------------------------------------------------------------------

fn cmd_classify(config: &AppConfig, text: &str) -> Result<()> {
    let mapping = todobot_intent::MappingConfig::load(&config.mappings.path)?;
    let request = split_hint(text);
    let classification = classify(&request.hint, &mapping);

    let report = serde_json::json!({
        "content": request.content,
        "hint": request.hint,
        "project": classification.project,
        "section": classification.section,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn cmd_extract(config: &AppConfig, text: &str) -> Result<()> {
    let extractor = extractor(config)?;
    let today = chrono::Local::now().date_naive();
    let task = extractor
        .extract(text, today)
        .await
        .context("extraction failed")?;
    println!("{}", serde_json::to_string_pretty(&task)?);
    Ok(())
}

fn cmd_status(config: &AppConfig) -> Result<()> {
    let set = |name: &str| {
        if env_non_empty(name).is_some() {
            "set"
        } else {
            "not set"
        }
    };
    let mapping = match todobot_intent::MappingConfig::load(&config.mappings.path) {
        Ok(mapping) => format!("{} project(s)", mapping.len()),
        Err(e) => format!("unusable ({e})"),
    };
    let web = config.web_config();

    println!();
    println!("  todobot v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("  Mapping file:    {}", config.mappings.path.display());
    println!("  Mapping:         {mapping}");
    println!("  Todoist API:     {}", config.todoist.base_url);
    println!("  Webhook:         {}:{}{}", web.bind_addr, web.port, web.webhook_path);
    println!("  Extractor model: {}", config.extractor.model);
    println!();
    println!("  {TELEGRAM_TOKEN_VAR:<24} {}", set(TELEGRAM_TOKEN_VAR));
    println!("  {TODOIST_TOKEN_VAR:<24} {}", set(TODOIST_TOKEN_VAR));
    println!("  {WEBHOOK_SECRET_VAR:<24} {}", set(WEBHOOK_SECRET_VAR));
    println!("  {OPENAI_KEY_VAR:<24} {}", set(OPENAI_KEY_VAR));
    println!();
    Ok(())
}
