//! Tally CLI - Inspect fulfillment availability for an order snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Units still free for a new fulfillment
//! tally available order-1001.yaml
//!
//! # Edit view of an existing fulfillment, as JSON
//! tally edit order-1001.yaml --fulfillment 900 --format json
//!
//! # Selected vs. total units
//! tally summary order-1001.yaml --fulfillment 900
//! ```
//!
//! # Commands
//!
//! - `available` - Units not yet refunded or allocated to any fulfillment
//! - `edit` - Units shown while editing an existing fulfillment
//! - `summary` - Selected vs. total unit counts
//!
//! See [`config`] for environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_core::FulfillmentId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod snapshot;

use commands::OutputFormat;
use config::{CliConfig, LogFormat};
use error::CliError;

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "Tally fulfillment reconciliation tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show units still free for a new fulfillment
    Available {
        /// Snapshot file (.json, .yaml or .yml)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Show an existing fulfillment's units as they appear when editing it
    Edit {
        /// Snapshot file (.json, .yaml or .yml)
        file: PathBuf,

        /// Fulfillment ID to open
        #[arg(long)]
        fulfillment: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Count selected vs. total units
    Summary {
        /// Snapshot file (.json, .yaml or .yml)
        file: PathBuf,

        /// Fulfillment ID to summarise (default: a new fulfillment)
        #[arg(long)]
        fulfillment: Option<i64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

/// Initialize tracing, JSON or text depending on config.
fn init_tracing(log_format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tally_core=info,tally_cli=info".into());

    let is_json = log_format == LogFormat::Json;
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is configured from this config, so fall back to defaults to report it
            init_tracing(LogFormat::default());
            tracing::error!("Command failed: {}", CliError::from(e));
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CliConfig) -> Result<(), CliError> {
    match cli.command {
        Commands::Available { file, format } => {
            commands::available::run(&file, format, config).await?;
        }
        Commands::Edit {
            file,
            fulfillment,
            format,
        } => {
            commands::edit::run(&file, FulfillmentId::new(fulfillment), format, config).await?;
        }
        Commands::Summary {
            file,
            fulfillment,
            format,
        } => {
            commands::summary::run(&file, fulfillment.map(FulfillmentId::new), format, config)
                .await?;
        }
    }
    Ok(())
}
