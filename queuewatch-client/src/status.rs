//! Status and worker endpoints

use crate::QueueClient;
use crate::error::Result;
use queuewatch_core::domain::status::WorkerInfo;
use queuewatch_core::dto::jobs::WorkersPayload;
use queuewatch_core::dto::status::StatusPayload;

impl QueueClient {
    // =============================================================================
    // Queue Status
    // =============================================================================

    /// Fetch the aggregate queue status
    ///
    /// # Returns
    /// The raw status response; every field is optional
    ///
    /// # Example
    /// ```no_run
    /// # use queuewatch_client::QueueClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = QueueClient::new("http://localhost:5000");
    /// let status = client.get_status().await?;
    /// println!("dead jobs: {:?}", status.dead);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_status(&self) -> Result<StatusPayload> {
        self.get_json("/api/status").await
    }

    // =============================================================================
    // Workers
    // =============================================================================

    /// List registered workers
    ///
    /// # Returns
    /// Every worker the backend knows about, possibly empty
    pub async fn list_workers(&self) -> Result<Vec<WorkerInfo>> {
        let payload: WorkersPayload = self.get_json("/api/workers").await?;
        Ok(payload.into_workers())
    }
}
