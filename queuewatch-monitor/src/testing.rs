//! Scripted in-memory backend for poller tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use queuewatch_client::{FetchError, QueueApi, Result};
use queuewatch_core::domain::job::StateFilter;
use queuewatch_core::dto::jobs::JobsPayload;
use queuewatch_core::dto::status::StatusPayload;
use serde_json::Value;
use tokio::time::Instant;

pub(crate) const BASE_URL: &str = "http://fake-backend:5000";

/// One scripted response: wait `delay`, then answer
pub(crate) struct Step {
    delay: Duration,
    reply: std::result::Result<Value, u16>,
}

impl Step {
    pub(crate) fn ok(body: Value) -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Ok(body),
        }
    }

    pub(crate) fn status_code(code: u16) -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Err(code),
        }
    }

    pub(crate) fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request the fake received
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    pub(crate) path: String,
    /// Milliseconds since the fake was created
    pub(crate) at_ms: u128,
}

#[derive(Default)]
struct Counter {
    current: AtomicUsize,
    max: AtomicUsize,
}

struct InFlight<'a>(&'a Counter);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a Counter) -> Self {
        let now = counter.current.fetch_add(1, Ordering::SeqCst) + 1;
        counter.max.fetch_max(now, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Backend double answering from per-endpoint scripts
///
/// When a script runs out, the endpoint answers `{}` immediately.
pub(crate) struct FakeApi {
    started: Instant,
    status_script: Mutex<VecDeque<Step>>,
    jobs_script: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Call>>,
    status_in_flight: Counter,
    jobs_in_flight: Counter,
}

impl FakeApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            started: Instant::now(),
            status_script: Mutex::new(VecDeque::new()),
            jobs_script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            status_in_flight: Counter::default(),
            jobs_in_flight: Counter::default(),
        })
    }

    pub(crate) fn push_status(&self, step: Step) {
        self.status_script.lock().unwrap().push_back(step);
    }

    pub(crate) fn push_jobs(&self, step: Step) {
        self.jobs_script.lock().unwrap().push_back(step);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// `(at_ms, path)` of every call to `prefix`-matching endpoints
    pub(crate) fn calls_to(&self, prefix: &str) -> Vec<(u128, String)> {
        self.calls()
            .into_iter()
            .filter(|call| call.path.starts_with(prefix))
            .map(|call| (call.at_ms, call.path))
            .collect()
    }

    pub(crate) fn max_status_in_flight(&self) -> usize {
        self.status_in_flight.max.load(Ordering::SeqCst)
    }

    pub(crate) fn max_jobs_in_flight(&self) -> usize {
        self.jobs_in_flight.max.load(Ordering::SeqCst)
    }

    fn record(&self, path: String) {
        let at_ms = Instant::now().duration_since(self.started).as_millis();
        self.calls.lock().unwrap().push(Call { path, at_ms });
    }

    async fn answer<T>(&self, script: &Mutex<VecDeque<Step>>) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let step = script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Step::ok(Value::Object(Default::default())));

        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }

        match step.reply {
            Ok(body) => serde_json::from_value(body)
                .map_err(|e| FetchError::ParseError(e.to_string())),
            Err(code) => Err(FetchError::api_error(code, "scripted failure")),
        }
    }
}

#[async_trait]
impl QueueApi for FakeApi {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    async fn status(&self) -> Result<StatusPayload> {
        self.record("/api/status".to_string());
        let _in_flight = InFlight::enter(&self.status_in_flight);
        self.answer(&self.status_script).await
    }

    async fn jobs(&self, filter: StateFilter) -> Result<JobsPayload> {
        self.record(filter.jobs_path());
        let _in_flight = InFlight::enter(&self.jobs_in_flight);
        self.answer(&self.jobs_script).await
    }
}
