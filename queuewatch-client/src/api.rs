//! Transport seam used by the monitor
//!
//! Pollers talk to the backend through [`QueueApi`] so they can be driven by
//! an in-memory fake in tests. Implementations only perform the request;
//! time bounds are applied by the caller with [`crate::fetch::with_timeout`].

use async_trait::async_trait;
use queuewatch_core::domain::job::StateFilter;
use queuewatch_core::dto::jobs::JobsPayload;
use queuewatch_core::dto::status::StatusPayload;

use crate::QueueClient;
use crate::error::Result;

/// Read-only access to the job-queue backend
#[async_trait]
pub trait QueueApi: Send + Sync {
    /// Base URL of the backend, used in user-facing error messages
    fn base_url(&self) -> &str;

    /// Fetches `/api/status`
    async fn status(&self) -> Result<StatusPayload>;

    /// Fetches the job list endpoint for `filter`
    async fn jobs(&self, filter: StateFilter) -> Result<JobsPayload>;
}

#[async_trait]
impl QueueApi for QueueClient {
    fn base_url(&self) -> &str {
        QueueClient::base_url(self)
    }

    async fn status(&self) -> Result<StatusPayload> {
        self.get_status().await
    }

    async fn jobs(&self, filter: StateFilter) -> Result<JobsPayload> {
        self.get_jobs(filter).await
    }
}
