//! Monitor configuration
//!
//! Defines the backend location, the per-request time bound and the cadence
//! of each poller.

use std::time::Duration;

use queuewatch_client::DEFAULT_BASE_URL;
use queuewatch_client::fetch::DEFAULT_TIMEOUT;
use queuewatch_core::domain::job::StateFilter;

/// Default period of the status poller
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_millis(2000);

/// Default period of the jobs poller
pub const DEFAULT_JOBS_INTERVAL: Duration = Duration::from_millis(5000);

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Backend base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Maximum time a single request may take before it counts as timed out
    pub request_timeout: Duration,

    /// How often the status endpoint is polled, measured from cycle start
    pub status_interval: Duration,

    /// How often the job list is polled; restarted on every filter change
    pub jobs_interval: Duration,

    /// Filter the job list starts with
    pub initial_filter: StateFilter,
}

impl MonitorConfig {
    /// Creates a configuration with default timings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_TIMEOUT,
            status_interval: DEFAULT_STATUS_INTERVAL,
            jobs_interval: DEFAULT_JOBS_INTERVAL,
            initial_filter: StateFilter::All,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = interval;
        self
    }

    pub fn with_jobs_interval(mut self, interval: Duration) -> Self {
        self.jobs_interval = interval;
        self
    }

    pub fn with_initial_filter(mut self, filter: StateFilter) -> Self {
        self.initial_filter = filter;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.status_interval.is_zero() {
            anyhow::bail!("status_interval must be greater than 0");
        }

        if self.jobs_interval.is_zero() {
            anyhow::bail!("jobs_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
