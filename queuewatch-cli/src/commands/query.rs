//! One-shot query handlers
//!
//! Each command performs a single time-bounded request and prints the
//! result. A failed request is reported as an error with the same wording the
//! dashboard uses.

use anyhow::{Result, anyhow};
use colored::*;
use queuewatch_client::{FetchError, QueueClient};
use queuewatch_core::domain::job::StateFilter;
use queuewatch_core::domain::status::StatusSnapshot;
use queuewatch_core::dto::jobs::{JobsPayload, WorkersPayload};
use queuewatch_core::dto::status::StatusPayload;
use queuewatch_monitor::view_model::failure_message;

use crate::config::Config;
use crate::render;

fn describe(client: &QueueClient, error: FetchError) -> anyhow::Error {
    tracing::debug!("Request failed: {}", error);
    anyhow!("{} ({})", failure_message(error.kind(), client.base_url()), error)
}

/// Show aggregate queue status
pub async fn show_status(config: &Config) -> Result<()> {
    let client = QueueClient::new(config.base_url.clone());
    let payload: StatusPayload = client
        .fetch_json("/api/status", config.request_timeout)
        .await
        .map_err(|e| describe(&client, e))?;

    let mut snapshot = StatusSnapshot::default();
    snapshot.merge(payload);
    snapshot.success = true;

    render::print_status(&snapshot);
    Ok(())
}

/// List jobs for a filter
pub async fn list_jobs(config: &Config, filter: StateFilter) -> Result<()> {
    let client = QueueClient::new(config.base_url.clone());
    let jobs = client
        .fetch_json::<JobsPayload>(&filter.jobs_path(), config.request_timeout)
        .await
        .map_err(|e| describe(&client, e))?
        .into_jobs();

    if jobs.is_empty() {
        println!("{}", format!("No {} jobs found.", filter).yellow());
    } else {
        println!(
            "{}",
            format!("Found {} job(s) (filter: {}):", jobs.len(), filter).bold()
        );
        println!();
        render::print_jobs(&jobs);
    }

    Ok(())
}

/// List registered workers
pub async fn list_workers(config: &Config) -> Result<()> {
    let client = QueueClient::new(config.base_url.clone());
    let workers = client
        .fetch_json::<WorkersPayload>("/api/workers", config.request_timeout)
        .await
        .map_err(|e| describe(&client, e))?
        .into_workers();

    if workers.is_empty() {
        println!("{}", "No active workers.".yellow());
    } else {
        println!("{}", format!("Found {} worker(s):", workers.len()).bold());
        println!();
        render::print_workers(&workers);
    }

    Ok(())
}
