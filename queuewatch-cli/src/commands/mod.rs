//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod query;
mod watch;

use anyhow::Result;
use clap::Subcommand;
use queuewatch_core::domain::job::StateFilter;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Live dashboard (keys: r = refresh, f <state> = filter, q = quit)
    Watch {
        /// Initial job list filter
        #[arg(short, long, default_value = "all")]
        state: StateFilter,
    },
    /// Show queue status once
    Status,
    /// List jobs once
    Jobs {
        /// Job list filter
        #[arg(short, long, default_value = "all")]
        state: StateFilter,
    },
    /// List registered workers once
    Workers,
}

/// Handle a CLI command
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Watch { state } => watch::run(config, state).await,
        Commands::Status => query::show_status(config).await,
        Commands::Jobs { state } => query::list_jobs(config, state).await,
        Commands::Workers => query::list_workers(config).await,
    }
}
