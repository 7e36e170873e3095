//! Job and worker list DTOs

use serde::Deserialize;

use crate::domain::job::Job;
use crate::domain::status::WorkerInfo;

/// Response of `GET /api/jobs` and `GET /api/jobs/{state}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobsPayload {
    #[serde(default)]
    pub jobs: Option<Vec<Job>>,
}

impl JobsPayload {
    /// The job list; a response without a `jobs` array means no jobs
    pub fn into_jobs(self) -> Vec<Job> {
        self.jobs.unwrap_or_default()
    }
}

/// Response of `GET /api/workers`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkersPayload {
    #[serde(default)]
    pub workers: Option<Vec<WorkerInfo>>,
}

impl WorkersPayload {
    pub fn into_workers(self) -> Vec<WorkerInfo> {
        self.workers.unwrap_or_default()
    }
}
