//! Configuration module
//!
//! Settings shared by every command.

use std::time::Duration;

use queuewatch_core::domain::job::StateFilter;
use queuewatch_monitor::MonitorConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the backend
    pub base_url: String,
    /// Bound applied to every request
    pub request_timeout: Duration,
}

impl Config {
    /// Monitor configuration for the dashboard, starting on `filter`
    pub fn monitor(&self, filter: StateFilter) -> MonitorConfig {
        MonitorConfig::new(self.base_url.clone())
            .with_request_timeout(self.request_timeout)
            .with_initial_filter(filter)
    }
}
