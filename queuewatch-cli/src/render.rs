//! Terminal rendering
//!
//! Plain `println!` output colored with `colored`. State labels are colored
//! by state regardless of how the backend cased them.

use chrono::{DateTime, Utc};
use colored::*;
use queuewatch_core::domain::job::{Job, JobState, StateFilter};
use queuewatch_core::domain::status::{StatusSnapshot, WorkerInfo};
use queuewatch_monitor::ViewModel;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp for display, `N/A` when absent
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Display color of a state label, ignoring case
fn state_color(label: &str) -> Option<Color> {
    match JobState::parse(label) {
        JobState::Pending => Some(Color::Yellow),
        JobState::Processing => Some(Color::Cyan),
        JobState::Completed => Some(Color::Green),
        JobState::Dead | JobState::Failed => Some(Color::Red),
        JobState::Delayed => Some(Color::Magenta),
        JobState::Unknown => None,
    }
}

/// Colorize a state label for display
pub fn colorize_state(label: &str) -> ColoredString {
    match state_color(label) {
        Some(color) => label.color(color),
        None => label.dimmed(),
    }
}

/// First eight characters of a job id
fn short_id(id: &str) -> String {
    if id.is_empty() {
        return "N/A".to_string();
    }
    match id.char_indices().nth(8) {
        Some((end, _)) => format!("{}...", &id[..end]),
        None => id.to_string(),
    }
}

fn or_na(text: &str) -> &str {
    if text.is_empty() { "N/A" } else { text }
}

/// Print aggregate status and per-state counts
pub fn print_status(status: &StatusSnapshot) {
    let running = if status.running {
        "running".green()
    } else {
        "stopped".red()
    };

    println!("{}", "Queue Status:".bold());
    println!("  Workers:    {} ({})", status.worker_count(), running);
    println!("  Queued:     {}", status.queued);
    println!("  Processing: {}", status.processing);
    println!("  Dead:       {}", status.dead);
    println!();
    println!("{}", "Jobs by state:".bold());
    for state in JobState::KNOWN {
        println!(
            "  {:<12} {}",
            colorize_state(state.as_str()),
            status.count(state)
        );
    }
}

/// Print a job table
pub fn print_jobs(jobs: &[Job]) {
    println!(
        "  {:<12} {:<12} {:<10} {:<19} {}",
        "ID".bold(),
        "State".bold(),
        "Attempts".bold(),
        "Created".bold(),
        "Command".bold()
    );
    for job in jobs {
        let attempts = match job.max_retries {
            Some(max) => format!("{} / {}", job.attempts, max),
            None => format!("{} / N/A", job.attempts),
        };
        println!(
            "  {:<12} {:<12} {:<10} {:<19} {}",
            short_id(&job.id).dimmed(),
            colorize_state(job.state.as_str()),
            attempts,
            format_timestamp(job.created_at),
            or_na(&job.command)
        );
    }
}

/// Print registered workers
pub fn print_workers(workers: &[WorkerInfo]) {
    for worker in workers {
        let pid = worker
            .pid
            .map(|pid| pid.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        println!("  {} Worker {}", "▸".cyan(), or_na(&worker.worker_id));
        println!("    PID:     {}", pid);
        if let Some(parent) = worker.parent_pid {
            println!("    Parent:  {}", parent);
        }
        println!("    Started: {}", format_timestamp(worker.started_at));
    }
}

/// Redraw the whole dashboard
pub fn print_dashboard(view: &ViewModel) {
    // clear screen and home the cursor
    print!("\x1B[2J\x1B[H");

    println!("{}", "Queuewatch Dashboard".bold());
    println!(
        "{}",
        format!("Status updated: {}", format_timestamp(view.status_updated_at)).dimmed()
    );
    if let Some(error) = &view.error {
        println!("{} {}", "✗".red(), error.red());
    }
    println!();

    if view.status.success {
        print_status(&view.status);
    } else if view.error.is_none() {
        println!("{}", "Loading status...".dimmed());
    }
    println!();

    print_filter_bar(view.state_filter, view.refreshing);
    if view.jobs.is_empty() {
        if view.refreshing && view.jobs_updated_at.is_none() {
            println!("{}", "Loading jobs...".dimmed());
        } else {
            println!("{}", "No jobs found".yellow());
        }
    } else {
        print_jobs(&view.jobs);
    }

    if !view.status.workers_detail.is_empty() {
        println!();
        println!("{}", "Workers:".bold());
        print_workers(&view.status.workers_detail);
    }

    println!();
    println!("{}", "r = refresh, f <state> = filter, q = quit".dimmed());
}

fn print_filter_bar(current: StateFilter, refreshing: bool) {
    let filters: Vec<String> = StateFilter::ALL
        .into_iter()
        .map(|filter| {
            if filter == current {
                format!("[{}]", filter).bold().to_string()
            } else {
                filter.to_string()
            }
        })
        .collect();

    let marker = if refreshing { " ⟳" } else { "" };
    println!("{}{} {}", "Jobs:".bold(), marker, filters.join(" "));
}
