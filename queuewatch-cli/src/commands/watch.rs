//! Live dashboard
//!
//! Runs the monitor and redraws on every view model change. Commands are read
//! line by line from stdin; Ctrl-C quits like `q` does.

use std::future::Future;
use std::io;

use anyhow::Result;
use colored::*;
use queuewatch_core::domain::job::StateFilter;
use queuewatch_monitor::Monitor;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::render;

/// A dashboard command typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Refresh,
    Filter(StateFilter),
    Quit,
}

/// Parses one input line; blank lines yield `Ok(None)`
fn parse_input(line: &str) -> Result<Option<Input>, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let input = match command.to_ascii_lowercase().as_str() {
        "r" | "refresh" => Input::Refresh,
        "q" | "quit" | "exit" => Input::Quit,
        "f" | "filter" => {
            let name = words
                .next()
                .ok_or_else(|| "usage: f <all|pending|processing|completed|dead|delayed>".to_string())?;
            Input::Filter(name.parse().map_err(|e| format!("{}", e))?)
        }
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(Some(input))
}

/// Run the dashboard until the user quits
pub async fn run(config: &Config, filter: StateFilter) -> Result<()> {
    let monitor = Monitor::start(config.monitor(filter))?;
    let lines = BufReader::new(tokio::io::stdin()).lines();
    session(monitor, lines, tokio::signal::ctrl_c()).await
}

/// Drives the dashboard until quit, interrupt or an input error
///
/// The monitor is always shut down before this returns, including when
/// reading input fails.
async fn session<R, I>(monitor: Monitor, mut lines: Lines<R>, interrupt: I) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    I: Future<Output = io::Result<()>>,
{
    tokio::pin!(interrupt);
    let mut interrupt_armed = true;
    let mut revisions = monitor.subscribe();
    let mut stdin_open = true;
    let mut notice: Option<String> = None;
    let mut outcome = Ok(());

    redraw(&monitor, notice.as_deref());

    loop {
        tokio::select! {
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                revisions.borrow_and_update();
                redraw(&monitor, notice.as_deref());
            }

            line = lines.next_line(), if stdin_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        debug!("stdin closed, dashboard keeps running until Ctrl-C");
                        stdin_open = false;
                        continue;
                    }
                    Err(e) => {
                        outcome =
                            Err(anyhow::Error::new(e).context("Failed to read command input"));
                        break;
                    }
                };

                notice = None;
                match parse_input(&line) {
                    Ok(None) => {}
                    Ok(Some(Input::Refresh)) => monitor.on_refresh(),
                    Ok(Some(Input::Filter(filter))) => {
                        if !monitor.set_state_filter(filter) {
                            notice = Some(format!("Already showing {} jobs", filter));
                        }
                    }
                    Ok(Some(Input::Quit)) => break,
                    Err(message) => notice = Some(message),
                }
                redraw(&monitor, notice.as_deref());
            }

            signal = &mut interrupt, if interrupt_armed => match signal {
                Ok(()) => {
                    info!("Interrupted");
                    break;
                }
                Err(e) => {
                    warn!("Cannot listen for Ctrl-C: {}", e);
                    interrupt_armed = false;
                }
            },
        }
    }

    monitor.shutdown().await;
    outcome
}

fn redraw(monitor: &Monitor, notice: Option<&str>) {
    render::print_dashboard(&monitor.view());
    if let Some(notice) = notice {
        println!("{}", notice.yellow());
    }
}
