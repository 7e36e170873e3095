//! Status endpoint DTOs

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::domain::job::JobState;
use crate::domain::status::WorkerInfo;
use crate::dto::lenient;

/// Response of `GET /api/status`
///
/// Every field is optional; whatever is present gets merged into the
/// current [`StatusSnapshot`](crate::domain::status::StatusSnapshot).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub running: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub queued: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub processing: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub dead: Option<u64>,
    #[serde(default)]
    pub workers: Option<WorkersField>,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub worker_count: Option<u64>,
    #[serde(default, deserialize_with = "summary")]
    pub summary: Option<BTreeMap<JobState, u64>>,
    #[serde(default)]
    pub workers_detail: Option<Vec<WorkerInfo>>,
}

/// The `workers` field is either a plain count or the list of workers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WorkersField {
    Count(#[serde(deserialize_with = "lenient::int_or_zero")] u64),
    Detail(Vec<WorkerInfo>),
}

#[derive(Deserialize)]
struct Count(#[serde(deserialize_with = "lenient::int_or_zero")] u64);

fn summary<'de, D>(deserializer: D) -> Result<Option<BTreeMap<JobState, u64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Count>>::deserialize(deserializer)?;
    Ok(raw.map(|raw| normalize_summary(raw.into_iter().map(|(label, Count(n))| (label, n)))))
}

/// Collapses raw summary labels into canonical states
///
/// When several casings of one state are present, the first non-zero count
/// wins in this order: lower case, upper case, then any other casing in key
/// order. A zero only stands when every casing is zero. Counts are never
/// summed across casings. Labels of unknown states are dropped.
pub fn normalize_summary<I>(entries: I) -> BTreeMap<JobState, u64>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let mut ranked: BTreeMap<JobState, ((bool, u8), u64)> = BTreeMap::new();

    for (label, count) in entries {
        let state = JobState::parse(&label);
        if !state.is_known() {
            tracing::debug!("Dropping summary entry for unknown state {:?}", label);
            continue;
        }

        let rank = if label == state.as_str() {
            0
        } else if label == state.as_str().to_ascii_uppercase() {
            1
        } else {
            2
        };

        // zero counts sort after every non-zero count
        let key = (count == 0, rank);
        match ranked.entry(state) {
            Entry::Vacant(slot) => {
                slot.insert((key, count));
            }
            Entry::Occupied(mut slot) => {
                if key < slot.get().0 {
                    slot.insert((key, count));
                }
            }
        }
    }

    ranked
        .into_iter()
        .map(|(state, (_, count))| (state, count))
        .collect()
}
