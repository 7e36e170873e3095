//! Shared view model
//!
//! The view model is the only place poller results land. It is split into two
//! slots with separate locks: the status slot (snapshot, error message) is
//! written only through [`StatusWriter`], the jobs slot (job list, refreshing
//! flag) only through [`JobsWriter`]. Exactly one writer of each kind exists
//! per view model, so field ownership is enforced by construction. The state
//! filter is written by the presentation layer through the monitor.
//!
//! Readers take a [`ViewModel`] snapshot at any time.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use queuewatch_client::{ErrorKind, FetchError};
use queuewatch_core::domain::job::{Job, StateFilter};
use queuewatch_core::domain::status::StatusSnapshot;
use queuewatch_core::dto::jobs::JobsPayload;
use queuewatch_core::dto::status::StatusPayload;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Message shown when the status request timed out
pub const TIMEOUT_MESSAGE: &str = "Backend request timed out. Server may be too slow or offline.";

/// User-facing message for a failed status fetch
pub fn failure_message(kind: ErrorKind, base_url: &str) -> String {
    match kind {
        ErrorKind::Timeout => TIMEOUT_MESSAGE.to_string(),
        ErrorKind::Network | ErrorKind::Decode => format!("Cannot reach backend at {}", base_url),
    }
}

/// Point-in-time copy of everything the presentation layer renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewModel {
    /// Last known-good queue status
    pub status: StatusSnapshot,
    /// Last known-good job list for the current filter
    pub jobs: Vec<Job>,
    /// Error from the most recent status fetch, if it failed
    pub error: Option<String>,
    /// True while a job list fetch is outstanding
    pub refreshing: bool,
    pub state_filter: StateFilter,
    pub status_updated_at: Option<DateTime<Utc>>,
    pub jobs_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct StatusSlot {
    snapshot: StatusSnapshot,
    error: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct JobsSlot {
    jobs: Vec<Job>,
    refreshing: bool,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct Shared {
    status: RwLock<StatusSlot>,
    jobs: RwLock<JobsSlot>,
    filter: watch::Sender<StateFilter>,
    revision: watch::Sender<u64>,
    closed: CancellationToken,
}

impl Shared {
    fn bump(&self) {
        self.revision.send_modify(|revision| *revision = revision.wrapping_add(1));
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Read handle to the view model
///
/// Cheap to clone. Mutation happens only through the writer handles created
/// alongside it and through [`crate::Monitor::set_state_filter`].
#[derive(Debug, Clone)]
pub struct SharedViewModel {
    shared: Arc<Shared>,
}

impl SharedViewModel {
    /// Creates an empty view model together with its two writers
    pub(crate) fn new(
        initial_filter: StateFilter,
        base_url: impl Into<String>,
    ) -> (Self, StatusWriter, JobsWriter) {
        let shared = Arc::new(Shared {
            status: RwLock::new(StatusSlot::default()),
            jobs: RwLock::new(JobsSlot::default()),
            filter: watch::Sender::new(initial_filter),
            revision: watch::Sender::new(0),
            closed: CancellationToken::new(),
        });

        let status_writer = StatusWriter {
            shared: Arc::clone(&shared),
            base_url: base_url.into(),
        };
        let jobs_writer = JobsWriter {
            shared: Arc::clone(&shared),
        };

        (Self { shared }, status_writer, jobs_writer)
    }

    /// Copies the current state
    ///
    /// The two slots are read one after the other, not atomically; each is
    /// internally consistent.
    pub fn snapshot(&self) -> ViewModel {
        let (status, error, status_updated_at) = {
            let slot = read(&self.shared.status);
            (slot.snapshot.clone(), slot.error.clone(), slot.updated_at)
        };
        let (jobs, refreshing, jobs_updated_at) = {
            let slot = read(&self.shared.jobs);
            (slot.jobs.clone(), slot.refreshing, slot.updated_at)
        };

        ViewModel {
            status,
            jobs,
            error,
            refreshing,
            state_filter: self.state_filter(),
            status_updated_at,
            jobs_updated_at,
        }
    }

    pub fn state_filter(&self) -> StateFilter {
        *self.shared.filter.borrow()
    }

    /// Receiver whose value changes on every mutation
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    /// Whether the view model has stopped accepting poller results
    pub fn is_closed(&self) -> bool {
        self.shared.closed.is_cancelled()
    }

    /// Selects a new state filter; returns false if it was already selected
    pub(crate) fn set_state_filter(&self, filter: StateFilter) -> bool {
        if self.is_closed() {
            return false;
        }

        let changed = self.shared.filter.send_if_modified(|current| {
            if *current == filter {
                false
            } else {
                *current = filter;
                true
            }
        });

        if changed {
            info!("State filter set to {}", filter);
            self.shared.bump();
        }
        changed
    }

    pub(crate) fn watch_filter(&self) -> watch::Receiver<StateFilter> {
        self.shared.filter.subscribe()
    }

    /// Stops accepting poller results
    ///
    /// Once this returns, no write through either writer can change the status
    /// snapshot, the error or the job list. Writes already holding a slot lock
    /// finish first.
    pub(crate) fn close(&self) {
        self.shared.closed.cancel();
        drop(write(&self.shared.status));
        drop(write(&self.shared.jobs));
    }
}

/// Sole writer of the status snapshot and the error message
#[derive(Debug)]
pub(crate) struct StatusWriter {
    shared: Arc<Shared>,
    base_url: String,
}

impl StatusWriter {
    /// Applies one status fetch outcome
    ///
    /// Success merges the payload, marks the snapshot successful and clears
    /// the error. Failure leaves the snapshot untouched and sets the error
    /// message. Returns false if the view model is closed.
    pub(crate) fn apply_status(&self, outcome: Result<StatusPayload, FetchError>) -> bool {
        let mut slot = write(&self.shared.status);
        if self.shared.closed.is_cancelled() {
            debug!("Discarding status result after shutdown");
            return false;
        }

        match outcome {
            Ok(payload) => {
                if slot.error.is_some() {
                    info!("Backend status reachable again");
                }
                slot.snapshot.merge(payload);
                slot.snapshot.success = true;
                slot.error = None;
                slot.updated_at = Some(Utc::now());
            }
            Err(e) => {
                let message = failure_message(e.kind(), &self.base_url);
                if slot.error.as_deref() == Some(message.as_str()) {
                    debug!("Status fetch failed again: {}", e);
                } else {
                    warn!("Status fetch failed: {}", e);
                }
                slot.error = Some(message);
            }
        }

        drop(slot);
        self.shared.bump();
        true
    }
}

/// Sole writer of the job list and the refreshing flag
#[derive(Debug)]
pub(crate) struct JobsWriter {
    shared: Arc<Shared>,
}

impl JobsWriter {
    /// Marks a job list fetch as outstanding until the guard is dropped
    pub(crate) fn begin_refresh(&self) -> RefreshGuard {
        write(&self.shared.jobs).refreshing = true;
        self.shared.bump();
        RefreshGuard {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Applies one job list fetch outcome for the filter it was requested with
    ///
    /// Success replaces the job list wholesale. Failure is logged and changes
    /// nothing; it never reaches the error message. A result for a filter
    /// that is no longer selected is discarded. Returns whether the job list
    /// was replaced.
    pub(crate) fn apply_jobs(
        &self,
        filter: StateFilter,
        outcome: Result<JobsPayload, FetchError>,
    ) -> bool {
        let mut slot = write(&self.shared.jobs);
        if self.shared.closed.is_cancelled() {
            debug!("Discarding job list after shutdown");
            return false;
        }

        let current = *self.shared.filter.borrow();
        if filter != current {
            debug!("Discarding job list for {} (now showing {})", filter, current);
            return false;
        }

        match outcome {
            Ok(payload) => {
                slot.jobs = payload.into_jobs();
                slot.updated_at = Some(Utc::now());
                debug!("Job list replaced ({} job(s), filter {})", slot.jobs.len(), filter);
            }
            Err(e) => {
                warn!("Jobs fetch failed (filter {}): {}", filter, e);
                return false;
            }
        }

        drop(slot);
        self.shared.bump();
        true
    }
}

/// Clears the refreshing flag when dropped, whatever the fetch outcome
#[derive(Debug)]
pub(crate) struct RefreshGuard {
    shared: Arc<Shared>,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        write(&self.shared.jobs).refreshing = false;
        self.shared.bump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use queuewatch_core::domain::job::JobState;
    use serde_json::json;
    use std::time::Duration;

    const BASE_URL: &str = "http://localhost:5000";

    fn view() -> (SharedViewModel, StatusWriter, JobsWriter) {
        SharedViewModel::new(StateFilter::All, BASE_URL)
    }

    fn status(value: serde_json::Value) -> Result<StatusPayload, FetchError> {
        Ok(serde_json::from_value(value).unwrap())
    }

    fn jobs(value: serde_json::Value) -> Result<JobsPayload, FetchError> {
        Ok(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_initial_view_is_empty() {
        let (view, _, _) = view();
        let snapshot = view.snapshot();

        assert_eq!(snapshot, ViewModel::default());
        assert!(!snapshot.status.success);
        assert!(snapshot.jobs.is_empty());
    }

    #[test]
    fn test_failure_never_changes_merged_fields() {
        let (view, status_writer, _) = view();
        status_writer.apply_status(status(json!({
            "queued": 5, "processing": 2, "running": true,
            "summary": {"pending": 5}
        })));
        let before = view.snapshot().status;

        status_writer.apply_status(Err(FetchError::Timeout(Duration::from_secs(8))));
        status_writer.apply_status(Err(FetchError::api_error(500, "down")));
        status_writer.apply_status(Err(FetchError::ParseError("bad json".to_string())));

        let after = view.snapshot();
        assert_eq!(after.status, before);
        assert!(after.status.success);
        assert_eq!(after.status.count(JobState::Pending), 5);
    }

    #[test]
    fn test_error_message_follows_latest_outcome() {
        let (view, status_writer, _) = view();

        status_writer.apply_status(Err(FetchError::Timeout(Duration::from_secs(8))));
        assert_eq!(view.snapshot().error.as_deref(), Some(TIMEOUT_MESSAGE));

        status_writer.apply_status(Err(FetchError::api_error(502, "")));
        assert_eq!(
            view.snapshot().error.as_deref(),
            Some("Cannot reach backend at http://localhost:5000")
        );

        status_writer.apply_status(status(json!({})));
        let snapshot = view.snapshot();
        assert_eq!(snapshot.error, None);
        assert!(snapshot.status.success);
        assert!(snapshot.status_updated_at.is_some());
    }

    #[test]
    fn test_apply_status_is_idempotent() {
        let (view, status_writer, _) = view();
        status_writer.apply_status(status(json!({"queued": 3, "workers": 2})));
        let once = view.snapshot().status;
        status_writer.apply_status(status(json!({"queued": 3, "workers": 2})));
        assert_eq!(view.snapshot().status, once);
    }

    #[test]
    fn test_jobs_replaced_wholesale_and_kept_on_failure() {
        let (view, _, jobs_writer) = view();

        jobs_writer.apply_jobs(
            StateFilter::All,
            jobs(json!({"jobs": [{"id": "a"}, {"id": "b"}]})),
        );
        assert_eq!(view.snapshot().jobs.len(), 2);

        assert!(!jobs_writer.apply_jobs(StateFilter::All, Err(FetchError::api_error(500, ""))));
        let snapshot = view.snapshot();
        assert_eq!(snapshot.jobs.len(), 2);
        assert_eq!(snapshot.error, None);

        jobs_writer.apply_jobs(StateFilter::All, jobs(json!({"success": true})));
        assert!(view.snapshot().jobs.is_empty());
    }

    #[test]
    fn test_stale_filter_result_is_discarded() {
        let (view, _, jobs_writer) = view();
        jobs_writer.apply_jobs(StateFilter::All, jobs(json!({"jobs": [{"id": "a"}]})));

        assert!(view.set_state_filter(StateFilter::Dead));
        assert!(!jobs_writer.apply_jobs(StateFilter::All, jobs(json!({"jobs": []}))));
        assert_eq!(view.snapshot().jobs.len(), 1);

        assert!(jobs_writer.apply_jobs(StateFilter::Dead, jobs(json!({"jobs": []}))));
        assert!(view.snapshot().jobs.is_empty());
    }

    #[test]
    fn test_refresh_guard_clears_flag() {
        let (view, _, jobs_writer) = view();
        assert!(!view.snapshot().refreshing);

        let guard = jobs_writer.begin_refresh();
        assert!(view.snapshot().refreshing);

        drop(guard);
        assert!(!view.snapshot().refreshing);
    }

    #[test]
    fn test_writers_do_not_touch_each_other() {
        let (view, status_writer, jobs_writer) = view();
        jobs_writer.apply_jobs(StateFilter::All, jobs(json!({"jobs": [{"id": "a"}]})));
        status_writer.apply_status(Err(FetchError::api_error(500, "")));

        let snapshot = view.snapshot();
        assert_eq!(snapshot.jobs.len(), 1);
        assert!(snapshot.error.is_some());

        jobs_writer.apply_jobs(StateFilter::All, Err(FetchError::api_error(500, "")));
        status_writer.apply_status(status(json!({"dead": 1})));
        let snapshot = view.snapshot();
        assert_eq!(snapshot.jobs.len(), 1);
        assert!(snapshot.error.is_none());
    }

    #[test]
    fn test_closed_view_rejects_results() {
        let (view, status_writer, jobs_writer) = view();
        status_writer.apply_status(status(json!({"queued": 1})));
        view.close();

        assert!(!status_writer.apply_status(status(json!({"queued": 9}))));
        assert!(!status_writer.apply_status(Err(FetchError::api_error(500, ""))));
        assert!(!jobs_writer.apply_jobs(StateFilter::All, jobs(json!({"jobs": [{"id": "x"}]}))));
        assert!(!view.set_state_filter(StateFilter::Pending));

        let snapshot = view.snapshot();
        assert_eq!(snapshot.status.queued, 1);
        assert!(snapshot.error.is_none());
        assert!(snapshot.jobs.is_empty());
        assert_eq!(snapshot.state_filter, StateFilter::All);
    }

    #[test]
    fn test_same_filter_is_not_a_change() {
        let (view, _, _) = view();
        assert!(!view.set_state_filter(StateFilter::All));
        assert!(view.set_state_filter(StateFilter::Completed));
        assert_eq!(view.state_filter(), StateFilter::Completed);
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let (view, status_writer, _) = view();
        let revisions = view.subscribe();
        let start = *revisions.borrow();

        status_writer.apply_status(status(json!({"queued": 1})));
        assert!(*revisions.borrow() > start);
    }
}
