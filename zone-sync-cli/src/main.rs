//! zone-sync entry point
//!
//! Loads configuration, authenticates, builds the remote cache and runs a
//! single zone operation. The operation's message goes to stdout; logs go
//! to stderr and are filtered by `RUST_LOG`.

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use zone_sync_core::{BasicZoneParser, OperationResult, StatusCode, ZoneSyncService};
use zone_sync_provider::StackpathClient;

use commands::{Command, exit_code};
use config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "zone-sync", version, about = "Synchronize DNS zone files into StackPath DNS")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "ZONE_SYNC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs to stderr; stdout carries the operation result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(cli).await {
        Ok(result) => report(&result),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(exit_code(StatusCode::Failure))
        }
    }
}

async fn run(cli: Cli) -> Result<OperationResult> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let command = cli.command.into_zone_command().await?;

    let client = StackpathClient::connect(config.client_config()).await?;
    tracing::info!("Connected to stack {}", client.stack_id());

    let service = ZoneSyncService::bootstrap(
        Arc::new(client),
        Arc::new(BasicZoneParser::new()),
        config.sync_settings(),
    )
    .await?;

    Ok(service.execute(command).await)
}

fn report(result: &OperationResult) -> ExitCode {
    match result.status {
        StatusCode::Success => println!("{}", result.message),
        StatusCode::Failure => eprintln!("error: {}", result.message),
        // Already written to the log by the engine
        StatusCode::FailureLogged => {}
    }
    ExitCode::from(exit_code(result.status))
}
