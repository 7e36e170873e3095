//! Monitor
//!
//! Owns the two pollers and the view model they write into. The presentation
//! layer talks only to this type: it reads snapshots, asks for a refresh,
//! changes the state filter and finally shuts everything down.

use std::sync::Arc;

use anyhow::{Context, Result};
use queuewatch_client::{QueueApi, QueueClient};
use queuewatch_core::domain::job::StateFilter;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::MonitorConfig;
use crate::scheduler::{JobsPoller, StatusPoller};
use crate::view_model::{SharedViewModel, ViewModel};

/// Running dashboard core
///
/// Must be created inside a Tokio runtime. Dropping it without calling
/// [`Monitor::shutdown`] still stops both pollers, but does not wait for them.
pub struct Monitor {
    view: SharedViewModel,
    status_refresh: Arc<Notify>,
    jobs_refresh: Arc<Notify>,
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Monitor {
    /// Validates `config` and starts polling the backend it names
    ///
    /// The first status and jobs fetches start immediately.
    pub fn start(config: MonitorConfig) -> Result<Self> {
        config.validate().context("Invalid monitor configuration")?;
        let client = QueueClient::new(config.base_url.clone());
        Ok(Self::with_api(&config, Arc::new(client)))
    }

    /// Starts polling through an arbitrary backend implementation
    pub fn with_api(config: &MonitorConfig, api: Arc<dyn QueueApi>) -> Self {
        info!(
            "Starting monitor for {} (status every {:?}, jobs every {:?}, timeout {:?})",
            api.base_url(),
            config.status_interval,
            config.jobs_interval,
            config.request_timeout
        );

        let (view, status_writer, jobs_writer) =
            SharedViewModel::new(config.initial_filter, api.base_url());

        let status_refresh = Arc::new(Notify::new());
        let jobs_refresh = Arc::new(Notify::new());
        let shutdown = CancellationToken::new();

        let status_poller = StatusPoller::new(
            Arc::clone(&api),
            status_writer,
            config.status_interval,
            config.request_timeout,
        );
        let jobs_poller = JobsPoller::new(
            api,
            jobs_writer,
            view.watch_filter(),
            config.jobs_interval,
            config.request_timeout,
        );

        let tasks = vec![
            tokio::spawn(status_poller.run(Arc::clone(&status_refresh), shutdown.clone())),
            tokio::spawn(jobs_poller.run(Arc::clone(&jobs_refresh), shutdown.clone())),
        ];

        Self {
            view,
            status_refresh,
            jobs_refresh,
            shutdown,
            tasks,
        }
    }

    /// Current state of the dashboard
    pub fn view(&self) -> ViewModel {
        self.view.snapshot()
    }

    /// Read handle that outlives borrows of the monitor
    pub fn view_model(&self) -> SharedViewModel {
        self.view.clone()
    }

    /// Receiver that changes whenever the view model does
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.view.subscribe()
    }

    /// Requests an immediate status and jobs cycle
    ///
    /// A poller whose fetch is still outstanding ignores the request.
    /// Neither regular timer moves.
    pub fn on_refresh(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.status_refresh.notify_one();
        self.jobs_refresh.notify_one();
    }

    /// Selects the job list filter
    ///
    /// The jobs poller fetches the new filter right away and restarts its
    /// interval. Returns false if `filter` was already selected or the
    /// monitor is shut down.
    pub fn set_state_filter(&self, filter: StateFilter) -> bool {
        self.view.set_state_filter(filter)
    }

    /// Stops both pollers
    ///
    /// No poller result reaches the view model after this starts. It returns
    /// once outstanding fetches have settled or timed out.
    pub async fn shutdown(mut self) {
        info!("Shutting down monitor");
        self.view.close();
        self.shutdown.cancel();

        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                warn!("Poller task panicked: {}", e);
            }
        }
        info!("Monitor stopped");
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.view.close();
        self.shutdown.cancel();
    }
}
