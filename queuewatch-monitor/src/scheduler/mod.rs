//! Scheduler layer for the monitor
//!
//! Each poller is a single task running a `select!` loop over its timer,
//! its refresh signal, the shutdown token and its one outstanding fetch.
//! Because the fetch lives in the loop as an explicit [`InFlight`] slot, "at
//! most one request per poller" is a property of the data structure: a tick
//! that finds the slot occupied does nothing.

mod jobs_poller;
mod status_poller;

pub(crate) use jobs_poller::JobsPoller;
pub(crate) use status_poller::StatusPoller;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use queuewatch_client::Result;
use queuewatch_client::fetch::with_timeout;
use tracing::debug;

type PendingFetch<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

/// A started, time-bounded fetch plus whatever must live exactly as long as it
pub(crate) struct InFlight<T, M> {
    pub(crate) meta: M,
    request: PendingFetch<T>,
}

impl<T: Send + 'static, M> InFlight<T, M> {
    pub(crate) fn start<F>(timeout: Duration, request: F, meta: M) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            meta,
            request: Box::pin(with_timeout(timeout, request)),
        }
    }
}

/// Resolves when the fetch in `slot` settles; pends forever on an empty slot
///
/// The caller must empty the slot once this resolves.
pub(crate) async fn settle<T, M>(slot: &mut Option<InFlight<T, M>>) -> Result<T> {
    match slot {
        Some(fetch) => (&mut fetch.request).await,
        None => std::future::pending().await,
    }
}

/// Lets an outstanding fetch finish or time out, discarding its result
pub(crate) async fn drain<T, M>(slot: Option<InFlight<T, M>>, poller: &str) {
    if let Some(mut fetch) = slot {
        debug!("Waiting for in-flight {} fetch before stopping", poller);
        let _ = (&mut fetch.request).await;
    }
}
