//! Queuewatch Monitor
//!
//! The polling and state-reconciliation core of the dashboard.
//!
//! Architecture:
//! - Configuration: backend URL, request timeout and poll cadences
//! - View model: the merged state the presentation layer reads, with one
//!   writer handle per poller so each owns a disjoint set of fields
//! - Scheduler: the status and jobs pollers, each an independent loop with at
//!   most one fetch in flight
//! - Monitor: starts both pollers and exposes refresh, filter changes and
//!   shutdown to the presentation layer
//!
//! A failed fetch never clears data: the view model always shows the last
//! known-good status and job list, plus an error message when the status
//! endpoint is unhealthy.

pub mod config;
pub mod monitor;
mod scheduler;
pub mod view_model;

#[cfg(test)]
mod testing;

pub use config::MonitorConfig;
pub use monitor::Monitor;
pub use view_model::{SharedViewModel, ViewModel};
