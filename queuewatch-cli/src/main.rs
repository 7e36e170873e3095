//! Queuewatch CLI
//!
//! Terminal dashboard and one-shot queries for the job-queue backend.

mod commands;
mod config;
mod render;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "queuewatch")]
#[command(about = "Job queue monitoring dashboard", long_about = None)]
struct Cli {
    /// Backend URL
    #[arg(long, env = "QUEUEWATCH_URL", default_value = "http://localhost:5000")]
    url: String,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "QUEUEWATCH_TIMEOUT_MS", default_value_t = 8000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with rendered output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "queuewatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        base_url: cli.url,
        request_timeout: Duration::from_millis(cli.timeout_ms),
    };

    handle_command(cli.command, &config).await
}
