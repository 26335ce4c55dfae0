// In app/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::prelude::*;

mod generate;
mod output;
mod signal;
mod train;

use crate::generate::GenerateArgs;
use crate::train::{ModelKind, TrainArgs};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "A moving-average crossover and regression signal engine."
)]
struct Cli {
    /// Overrides the configured log level (e.g., "debug", "warn").
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reads one signal request as JSON and writes one signal record.
    Signal {
        /// Read the request from this file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Generates signals from a stored model for one or more symbols.
    Generate {
        #[arg(long)]
        model_id: String,

        /// The ticker to assess (e.g., "AAPL"). Repeat for several symbols.
        #[arg(short, long = "symbol", required = true)]
        symbols: Vec<String>,

        /// Predicted move (as a fraction) that a regression signal must exceed.
        #[arg(long)]
        threshold: Option<f64>,

        /// Overrides the volatility window stored with a regression model.
        #[arg(long)]
        window_size: Option<usize>,

        /// How many recent daily bars to fetch.
        #[arg(long)]
        days: Option<usize>,
    },

    /// Fits (or records) a model for a symbol and stores its artifact.
    Train {
        #[arg(long)]
        model_id: String,

        #[arg(short, long)]
        symbol: String,

        #[arg(long, value_enum, default_value_t = ModelKind::LinearRegression)]
        kind: ModelKind,

        #[arg(long)]
        short_window: Option<i64>,

        #[arg(long)]
        long_window: Option<i64>,

        #[arg(long)]
        window_size: Option<usize>,

        /// How many recent daily bars to train on.
        #[arg(long)]
        days: Option<usize>,
    },

    /// Lists the stored model ids.
    Models,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // A broken config file must not stop the stdin path from answering, so the
    // load error is reported once logging is up.
    let settings = app_config::load_settings();
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| settings.as_ref().ok().map(|s| s.app.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    init_tracing(&log_level);

    match run(cli.command, settings).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Command failed.");
            output::emit_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries only the JSON records.
fn init_tracing(level: &str) {
    let level = level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::filter::Targets::new()
                .with_target("hyper", tracing::Level::WARN)
                .with_target("reqwest", tracing::Level::WARN)
                .with_default(level),
        );
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Dispatches a command. `Ok(false)` means records were written but at least one failed.
async fn run(command: Commands, settings: app_config::Result<app_config::Settings>) -> Result<bool> {
    match command {
        Commands::Signal { input } => {
            if let Err(e) = &settings {
                tracing::warn!(error = %e, "Ignoring unreadable configuration for the signal command.");
            }
            Ok(signal::handle_signal(input.as_deref(), &mut std::io::stdout().lock()))
        }
        Commands::Generate {
            model_id,
            symbols,
            threshold,
            window_size,
            days,
        } => {
            let args = GenerateArgs {
                model_id,
                symbols,
                threshold,
                window_size,
                days,
            };
            generate::handle_generate(&settings?, args).await
        }
        Commands::Train {
            model_id,
            symbol,
            kind,
            short_window,
            long_window,
            window_size,
            days,
        } => {
            let args = TrainArgs {
                model_id,
                symbol,
                kind,
                short_window,
                long_window,
                window_size,
                days,
            };
            train::handle_train(&settings?, args).await?;
            Ok(true)
        }
        Commands::Models => {
            let settings = settings?;
            let ids = artifact_store::open(&settings.artifacts).list()?;
            tracing::info!(count = ids.len(), "Listed stored models.");
            output::emit(&serde_json::json!({ "status": "success", "models": ids }))?;
            Ok(true)
        }
    }
}
