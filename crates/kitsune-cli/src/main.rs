//! Console entry point for the Kitsune companion.
//!
//! Loads settings and saved progress, then runs the numbered menu loop on
//! stdin/stdout. Logs go to stderr, filtered by `RUST_LOG` (default `warn`)
//! so they stay out of the console UI.
//!
//! # Architecture
//!
//! ```text
//! stdin --> App (menus) --> ProgressionEngine --> XP drops / level-ups
//!                 |                                       |
//!                 +--> ChatClient --> chat server         +--> SnapshotStore
//! ```
//!
//! The process always exits with status 0; failures are reported on the
//! console and in the log.

mod app;
mod chat;
mod config;
mod error;
mod render;

use anyhow::Context;
use kitsune_core::{ProgressionEngine, SettingsStore};
use tokio::io::BufReader;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::chat::ChatClient;
use crate::config::CliConfig;

/// Application entry point.
///
/// Initializes logging, then runs the console session. Errors are logged
/// and printed rather than returned so the exit status stays 0.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    if let Err(e) = run().await {
        error!(error = %format!("{e:#}"), "kitsune stopped");
        println!("\n❌ Error: {e:#}");
    }

    // A pending stdin read lives on a blocking thread and would keep the
    // runtime from shutting down after Ctrl-C.
    if let Err(e) = std::io::Write::flush(&mut std::io::stdout()) {
        debug!(error = %e, "stdout flush failed");
    }
    std::process::exit(0);
}

async fn run() -> anyhow::Result<()> {
    println!("🦊 Starting Kitsune AI...");

    let config = CliConfig::from_env().context("loading runtime configuration")?;
    let settings_store = SettingsStore::from_env();
    let settings = settings_store.load();
    info!(
        endpoint = %settings.llm_endpoint,
        fox_color = %settings.fox_color,
        save_location = %settings.save_location.display(),
        chat_timeout_secs = config.chat_timeout.as_secs(),
        autosave_interval = config.autosave_interval,
        "configuration loaded"
    );

    let backend = ChatClient::new(&settings.llm_endpoint, &config);
    let input = BufReader::new(tokio::io::stdin());
    let mut app = App::new(
        ProgressionEngine::new(),
        settings,
        settings_store,
        backend,
        config,
        input,
        std::io::stdout(),
    );

    app.load_progress().context("loading saved progress")?;
    println!("✅ Kitsune AI ready!");

    let interrupted = tokio::select! {
        result = app.run() => {
            result.context("console session failed")?;
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };

    if interrupted {
        info!("interrupted, saving progress");
        app.save().context("saving progress after interrupt")?;
        println!("\n\n👋 Goodbye!");
    }
    Ok(())
}
