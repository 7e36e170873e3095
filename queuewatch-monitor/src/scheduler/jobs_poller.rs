//! Jobs poller
//!
//! Polls the job list endpoint for the selected state filter. The filter is
//! read when a fetch starts and travels with it, so the endpoint always
//! matches the filter at fetch time. Changing the filter fetches immediately
//! and restarts the interval; if a fetch is outstanding at that moment, the
//! new one starts as soon as it settles.

use std::sync::Arc;
use std::time::Duration;

use queuewatch_client::QueueApi;
use queuewatch_core::domain::job::StateFilter;
use queuewatch_core::dto::jobs::JobsPayload;
use tokio::sync::{Notify, watch};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{InFlight, drain, settle};
use crate::view_model::{JobsWriter, RefreshGuard};

/// What a jobs fetch carries besides the request itself
pub(crate) struct JobsTicket {
    filter: StateFilter,
    _refreshing: RefreshGuard,
}

type JobsFetch = InFlight<JobsPayload, JobsTicket>;

/// Jobs poller that keeps the job list of the view model current
pub(crate) struct JobsPoller {
    api: Arc<dyn QueueApi>,
    writer: JobsWriter,
    filter: watch::Receiver<StateFilter>,
    interval: Duration,
    timeout: Duration,
}

impl JobsPoller {
    /// Creates a new jobs poller
    pub(crate) fn new(
        api: Arc<dyn QueueApi>,
        writer: JobsWriter,
        filter: watch::Receiver<StateFilter>,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            api,
            writer,
            filter,
            interval,
            timeout,
        }
    }

    /// Runs the polling loop until `shutdown` is cancelled
    pub(crate) async fn run(mut self, refresh: Arc<Notify>, shutdown: CancellationToken) {
        info!(
            "Starting jobs poller (interval: {:?}, filter: {})",
            self.interval,
            *self.filter.borrow()
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight: Option<JobsFetch> = None;
        let mut rerun = false;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                outcome = settle(&mut in_flight) => {
                    if let Some(fetch) = in_flight.take() {
                        self.writer.apply_jobs(fetch.meta.filter, outcome);
                    }
                    if std::mem::take(&mut rerun) {
                        self.start(&mut in_flight, "filter change");
                    }
                }

                changed = self.filter.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.filter.borrow_and_update();
                    ticker.reset();
                    if in_flight.is_some() {
                        debug!("Filter changed during a jobs fetch, refetching once it settles");
                        rerun = true;
                    } else {
                        self.start(&mut in_flight, "filter change");
                    }
                }

                _ = ticker.tick() => self.start(&mut in_flight, "tick"),

                _ = refresh.notified() => self.start(&mut in_flight, "refresh"),
            }
        }

        drain(in_flight, "jobs").await;
        info!("Jobs poller stopped");
    }

    fn start(&self, slot: &mut Option<JobsFetch>, reason: &str) {
        if slot.is_some() {
            debug!("Jobs fetch still in flight, skipping {}", reason);
            return;
        }

        let filter = *self.filter.borrow();
        debug!("Polling jobs for {} ({})", filter, reason);

        let ticket = JobsTicket {
            filter,
            _refreshing: self.writer.begin_refresh(),
        };
        let api = Arc::clone(&self.api);
        *slot = Some(InFlight::start(
            self.timeout,
            async move { api.jobs(filter).await },
            ticket,
        ));
    }
}
