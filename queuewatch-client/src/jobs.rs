//! Job list endpoints

use crate::QueueClient;
use crate::error::Result;
use queuewatch_core::domain::job::{Job, StateFilter};
use queuewatch_core::dto::jobs::JobsPayload;

impl QueueClient {
    // =============================================================================
    // Job Listing
    // =============================================================================

    /// Fetch the job list for a filter
    ///
    /// `StateFilter::All` hits `/api/jobs`; any other filter hits
    /// `/api/jobs/{state}`, which the server scopes to that state.
    ///
    /// # Arguments
    /// * `filter` - Which jobs to list
    pub async fn get_jobs(&self, filter: StateFilter) -> Result<JobsPayload> {
        self.get_json(&filter.jobs_path()).await
    }

    /// List jobs for a filter
    ///
    /// # Returns
    /// The jobs, or an empty list if the response carried none
    ///
    /// # Example
    /// ```no_run
    /// # use queuewatch_client::QueueClient;
    /// # use queuewatch_core::domain::job::StateFilter;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = QueueClient::new("http://localhost:5000");
    /// let dead = client.list_jobs(StateFilter::Dead).await?;
    /// println!("{} dead job(s)", dead.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_jobs(&self, filter: StateFilter) -> Result<Vec<Job>> {
        Ok(self.get_jobs(filter).await?.into_jobs())
    }
}
