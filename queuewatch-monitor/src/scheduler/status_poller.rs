//! Status poller
//!
//! Polls `/api/status` on a fixed cadence measured from cycle start and
//! merges each outcome into the view model. Refresh requests add an extra
//! cycle without moving the regular timer.

use std::sync::Arc;
use std::time::Duration;

use queuewatch_client::QueueApi;
use queuewatch_core::dto::status::StatusPayload;
use tokio::sync::Notify;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{InFlight, drain, settle};
use crate::view_model::StatusWriter;

type StatusFetch = InFlight<StatusPayload, ()>;

/// Status poller that keeps the status slot of the view model current
pub(crate) struct StatusPoller {
    api: Arc<dyn QueueApi>,
    writer: StatusWriter,
    interval: Duration,
    timeout: Duration,
}

impl StatusPoller {
    /// Creates a new status poller
    pub(crate) fn new(
        api: Arc<dyn QueueApi>,
        writer: StatusWriter,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            api,
            writer,
            interval,
            timeout,
        }
    }

    /// Runs the polling loop until `shutdown` is cancelled
    pub(crate) async fn run(self, refresh: Arc<Notify>, shutdown: CancellationToken) {
        info!(
            "Starting status poller (interval: {:?}, timeout: {:?})",
            self.interval, self.timeout
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight: Option<StatusFetch> = None;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                outcome = settle(&mut in_flight) => {
                    in_flight = None;
                    self.writer.apply_status(outcome);
                }

                _ = ticker.tick() => self.start(&mut in_flight, "tick"),

                _ = refresh.notified() => self.start(&mut in_flight, "refresh"),
            }
        }

        drain(in_flight, "status").await;
        info!("Status poller stopped");
    }

    fn start(&self, slot: &mut Option<StatusFetch>, reason: &str) {
        if slot.is_some() {
            debug!("Status fetch still in flight, skipping {}", reason);
            return;
        }

        debug!("Polling status ({})", reason);
        let api = Arc::clone(&self.api);
        *slot = Some(InFlight::start(
            self.timeout,
            async move { api.status().await },
            (),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BASE_URL, FakeApi, Step};
    use crate::view_model::{SharedViewModel, TIMEOUT_MESSAGE};
    use queuewatch_core::domain::job::StateFilter;
    use serde_json::json;

    struct Harness {
        api: Arc<FakeApi>,
        view: SharedViewModel,
        refresh: Arc<Notify>,
        shutdown: CancellationToken,
        task: tokio::task::JoinHandle<()>,
    }

    fn spawn(api: Arc<FakeApi>, timeout: Duration) -> Harness {
        let (view, writer, _jobs) = SharedViewModel::new(StateFilter::All, BASE_URL);
        let poller = StatusPoller::new(
            api.clone(),
            writer,
            Duration::from_millis(2000),
            timeout,
        );
        let refresh = Arc::new(Notify::new());
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(poller.run(refresh.clone(), shutdown.clone()));

        Harness {
            api,
            view,
            refresh,
            shutdown,
            task,
        }
    }

    async fn advance_to(ms: u64, started: time::Instant) {
        time::sleep_until(started + Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cadence_measured_from_cycle_start() {
        let started = time::Instant::now();
        let api = FakeApi::new();
        for _ in 0..3 {
            api.push_status(Step::ok(json!({})).after(Duration::from_millis(300)));
        }
        let h = spawn(api, Duration::from_secs(8));

        advance_to(4100, started).await;

        let times: Vec<u128> = h.api.calls_to("/api/status").into_iter().map(|(at, _)| at).collect();
        assert_eq!(times, vec![0, 2000, 4000]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_keeps_last_known_good() {
        let started = time::Instant::now();
        let api = FakeApi::new();
        api.push_status(Step::ok(json!({"queued": 5, "processing": 2})));
        api.push_status(Step::ok(json!({"queued": 99})).after(Duration::from_secs(60)));
        let h = spawn(api, Duration::from_millis(3000));

        advance_to(100, started).await;
        assert_eq!(h.view.snapshot().status.queued, 5);

        // second fetch starts at 2000 and times out at 5000
        advance_to(5100, started).await;
        let view = h.view.snapshot();
        assert_eq!(view.status.queued, 5);
        assert_eq!(view.status.processing, 2);
        assert!(view.status.success);
        assert_eq!(view.error.as_deref(), Some(TIMEOUT_MESSAGE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_error_names_base_url_and_success_clears_it() {
        let started = time::Instant::now();
        let api = FakeApi::new();
        api.push_status(Step::status_code(503));
        api.push_status(Step::ok(json!({"dead": 3})));
        let h = spawn(api, Duration::from_secs(8));

        advance_to(100, started).await;
        let view = h.view.snapshot();
        assert_eq!(
            view.error.as_deref(),
            Some("Cannot reach backend at http://fake-backend:5000")
        );
        assert!(!view.status.success);

        advance_to(2100, started).await;
        let view = h.view.snapshot();
        assert_eq!(view.error, None);
        assert_eq!(view.status.dead, 3);
        assert!(view.status.success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_and_refreshes_skip_while_in_flight() {
        let started = time::Instant::now();
        let api = FakeApi::new();
        api.push_status(Step::ok(json!({})).after(Duration::from_millis(3000)));
        let h = spawn(api, Duration::from_secs(8));

        advance_to(1000, started).await;
        h.refresh.notify_one();
        advance_to(3500, started).await;

        // tick at 2000 and the refresh at 1000 found the fetch outstanding
        let times: Vec<u128> = h.api.calls_to("/api/status").into_iter().map(|(at, _)| at).collect();
        assert_eq!(times, vec![0]);

        advance_to(4100, started).await;
        let times: Vec<u128> = h.api.calls_to("/api/status").into_iter().map(|(at, _)| at).collect();
        assert_eq!(times, vec![0, 4000]);
        assert_eq!(h.api.max_status_in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_adds_cycle_without_resetting_timer() {
        let started = time::Instant::now();
        let api = FakeApi::new();
        let h = spawn(api, Duration::from_secs(8));

        advance_to(500, started).await;
        h.refresh.notify_one();
        advance_to(2100, started).await;

        let times: Vec<u128> = h.api.calls_to("/api/status").into_iter().map(|(at, _)| at).collect();
        assert_eq!(times, vec![0, 500, 2000]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drains_without_applying() {
        let started = time::Instant::now();
        let api = FakeApi::new();
        api.push_status(Step::ok(json!({"queued": 1})));
        api.push_status(Step::ok(json!({"queued": 42})).after(Duration::from_millis(1000)));
        let h = spawn(api, Duration::from_secs(8));

        advance_to(2500, started).await;
        h.view.close();
        h.shutdown.cancel();
        h.task.await.unwrap();

        // the drained fetch settled at 3000
        assert_eq!(time::Instant::now() - started, Duration::from_millis(3000));
        assert_eq!(h.view.snapshot().status.queued, 1);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(h.api.calls_to("/api/status").len(), 2);
    }
}
