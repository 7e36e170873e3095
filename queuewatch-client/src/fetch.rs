//! Time-bounded fetches
//!
//! The request and a timer race; whichever finishes first decides the outcome.
//! A request that loses is dropped, never awaited, so a late response cannot
//! reach anything downstream.

use std::future::Future;
use std::time::Duration;

use crate::error::{FetchError, Result};

/// Default bound for a single backend request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

/// Runs `request`, failing with [`FetchError::Timeout`] if it does not finish within `timeout`
pub async fn with_timeout<T, F>(timeout: Duration, request: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, request).await {
        Ok(outcome) => outcome,
        Err(_) => Err(FetchError::Timeout(timeout)),
    }
}
