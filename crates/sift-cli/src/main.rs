//! Sift CLI - Recover structured records from free-form model output.

use clap::Parser;
use sift_cli::commands;
use sift_cli::{Cli, Command, Config, Formatter};
use sift_extractor::ExtractionPipeline;
use sift_telemetry::ExtractionTelemetry;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> sift_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config, falling back to defaults when it is unreadable
    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => Config::path()?,
    };
    let config = Config::load_from(&config_path).unwrap_or_else(|e| {
        warn!(path = %config_path.display(), error = %e, "Using default configuration");
        Config::default()
    });

    // Determine output format and color setting
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let telemetry = Arc::new(ExtractionTelemetry::new());
    let pipeline = Arc::new(ExtractionPipeline::new(config.extractor.clone(), telemetry));

    match cli.command {
        Command::Recover(args) => {
            commands::execute_recover(args, &pipeline, &formatter).await?;
        }
        Command::Batch(args) => {
            commands::execute_batch(args, &pipeline, &formatter).await?;
        }
        Command::Replay(args) => {
            commands::execute_replay(args, pipeline, &formatter).await?;
        }
        Command::Schemas => {
            commands::execute_schemas(&formatter)?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
