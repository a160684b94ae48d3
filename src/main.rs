//! Lekse CLI entry point.

use anyhow::Result;
use clap::Parser;
use lekse::cli::{commands, Cli, Commands};
use lekse::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("lekse={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Notes {
            input,
            model,
            api_key,
        } => {
            commands::run_notes(input, model.clone(), api_key.clone(), settings).await?;
        }

        Commands::Transcribe { input } => {
            commands::run_transcribe(input, settings).await?;
        }
    }

    Ok(())
}
