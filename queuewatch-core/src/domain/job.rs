//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::dto::lenient;

/// A job as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub command: String,
    #[serde(default)]
    pub state: JobState,
    #[serde(default, deserialize_with = "lenient::int_or_zero")]
    pub attempts: u32,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub max_retries: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Job lifecycle state
///
/// The backend is inconsistent about casing (`pending` and `PENDING` both
/// occur), so labels are matched case-insensitively and always serialized in
/// lower case.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Dead,
    Delayed,
    Failed,
    /// A label this client does not know about
    #[default]
    Unknown,
}

impl JobState {
    /// Every known state, in display order
    pub const KNOWN: [JobState; 6] = [
        JobState::Pending,
        JobState::Processing,
        JobState::Completed,
        JobState::Dead,
        JobState::Delayed,
        JobState::Failed,
    ];

    /// Parses a backend label, ignoring case
    ///
    /// Labels outside the known set map to [`JobState::Unknown`].
    pub fn parse(label: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(label.trim()))
            .unwrap_or(JobState::Unknown)
    }

    /// Canonical lower-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Dead => "dead",
            JobState::Delayed => "delayed",
            JobState::Failed => "failed",
            JobState::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, JobState::Unknown)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.as_deref().map(JobState::parse).unwrap_or_default())
    }
}

/// Which jobs the job list shows
///
/// `All` uses the unfiltered endpoint; every other variant is scoped to exactly
/// one state on the server side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    #[default]
    All,
    Pending,
    Processing,
    Completed,
    Dead,
    Delayed,
}

impl StateFilter {
    /// Every selectable filter, in menu order
    pub const ALL: [StateFilter; 6] = [
        StateFilter::All,
        StateFilter::Pending,
        StateFilter::Processing,
        StateFilter::Completed,
        StateFilter::Dead,
        StateFilter::Delayed,
    ];

    /// The state this filter selects, or `None` for `All`
    pub fn state(self) -> Option<JobState> {
        match self {
            StateFilter::All => None,
            StateFilter::Pending => Some(JobState::Pending),
            StateFilter::Processing => Some(JobState::Processing),
            StateFilter::Completed => Some(JobState::Completed),
            StateFilter::Dead => Some(JobState::Dead),
            StateFilter::Delayed => Some(JobState::Delayed),
        }
    }

    pub fn as_str(self) -> &'static str {
        self.state().map(|state| state.as_str()).unwrap_or("all")
    }

    /// API path of the job list endpoint for this filter
    pub fn jobs_path(self) -> String {
        match self.state() {
            None => "/api/jobs".to_string(),
            Some(state) => format!("/api/jobs/{}", state),
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a filter name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown state filter '{0}' (expected one of: all, pending, processing, completed, dead, delayed)")]
pub struct ParseStateFilterError(pub String);

impl FromStr for StateFilter {
    type Err = ParseStateFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStateFilterError(s.to_string()))
    }
}
