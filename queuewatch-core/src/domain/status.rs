//! Queue status domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::job::JobState;
use crate::dto::lenient;
use crate::dto::status::{StatusPayload, WorkersField};

/// A worker process registered with the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerInfo {
    #[serde(default, deserialize_with = "lenient::string")]
    pub worker_id: String,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub pid: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub parent_pid: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub started_at: Option<DateTime<Utc>>,
}

/// Aggregate queue and worker status
///
/// The snapshot is long-lived: successful status responses are merged into it
/// field by field and failed ones never touch it, so it always holds the last
/// known-good value of every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// Whether at least one status response has been merged
    pub success: bool,
    pub running: bool,
    pub queued: u64,
    pub processing: u64,
    pub dead: u64,
    pub workers: u64,
    /// Job counts per state, keyed by canonical state
    pub summary: BTreeMap<JobState, u64>,
    pub workers_detail: Vec<WorkerInfo>,
}

impl StatusSnapshot {
    /// Shallow-merges a status response into this snapshot
    ///
    /// Every top-level field present in `payload` replaces the corresponding
    /// field; absent fields are left as they were. `summary` and
    /// `workers_detail` are replaced wholesale, never combined entry by entry.
    ///
    /// `workers` may carry a count or the worker list itself. A list sets both
    /// the count and the detail, but an explicit `workers_detail` or
    /// `worker_count` in the same response takes precedence.
    pub fn merge(&mut self, payload: StatusPayload) {
        if let Some(running) = payload.running {
            self.running = running;
        }
        if let Some(queued) = payload.queued {
            self.queued = queued;
        }
        if let Some(processing) = payload.processing {
            self.processing = processing;
        }
        if let Some(dead) = payload.dead {
            self.dead = dead;
        }

        match payload.workers {
            Some(WorkersField::Count(count)) => self.workers = count,
            Some(WorkersField::Detail(detail)) => {
                self.workers = detail.len() as u64;
                self.workers_detail = detail;
            }
            None => {}
        }
        if let Some(count) = payload.worker_count {
            self.workers = count;
        }
        if let Some(detail) = payload.workers_detail {
            self.workers_detail = detail;
        }

        if let Some(summary) = payload.summary {
            self.summary = summary;
        }
    }

    /// Number of jobs in `state` according to the summary
    pub fn count(&self, state: JobState) -> u64 {
        self.summary.get(&state).copied().unwrap_or(0)
    }

    /// Number of active workers, preferring the detail list when the backend sent one
    pub fn worker_count(&self) -> u64 {
        if self.workers_detail.is_empty() {
            self.workers
        } else {
            self.workers_detail.len() as u64
        }
    }
}
