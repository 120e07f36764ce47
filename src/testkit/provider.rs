//! Scripted stats provider.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{CollectionAddress, StatsSnapshot};
use crate::error::{FetchCause, FetchError};
use crate::port::{FetchOutcome, StatsProvider};

enum ScriptedFetch {
    Stats(StatsSnapshot),
    NotFound,
    Fail,
}

/// Provider that replays a per-collection script of fetch outcomes.
///
/// Each `fetch_stats` call pops the next scripted outcome for that
/// collection; an exhausted or missing script yields `NotFound`. Scripted
/// failures look like a retry budget exhausted against a 500.
#[derive(Default)]
pub struct ScriptedProvider {
    scripts: Mutex<HashMap<CollectionAddress, VecDeque<ScriptedFetch>>>,
    fetch_counts: Mutex<HashMap<CollectionAddress, usize>>,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_stats(&self, address: &CollectionAddress, snapshot: StatsSnapshot) {
        self.push(address, ScriptedFetch::Stats(snapshot));
    }

    pub fn script_not_found(&self, address: &CollectionAddress) {
        self.push(address, ScriptedFetch::NotFound);
    }

    pub fn script_failure(&self, address: &CollectionAddress) {
        self.push(address, ScriptedFetch::Fail);
    }

    fn push(&self, address: &CollectionAddress, outcome: ScriptedFetch) {
        self.scripts
            .lock()
            .entry(address.clone())
            .or_default()
            .push_back(outcome);
    }

    /// How many times stats were fetched for one collection.
    #[must_use]
    pub fn fetch_count(&self, address: &CollectionAddress) -> usize {
        self.fetch_counts.lock().get(address).copied().unwrap_or(0)
    }

    /// Total fetches across all collections.
    #[must_use]
    pub fn total_fetches(&self) -> usize {
        self.fetch_counts.lock().values().sum()
    }
}

#[async_trait]
impl StatsProvider for ScriptedProvider {
    async fn fetch_stats(
        &self,
        address: &CollectionAddress,
    ) -> Result<FetchOutcome, FetchError> {
        *self
            .fetch_counts
            .lock()
            .entry(address.clone())
            .or_default() += 1;

        let next = self
            .scripts
            .lock()
            .get_mut(address)
            .and_then(VecDeque::pop_front);

        match next {
            Some(ScriptedFetch::Stats(snapshot)) => Ok(FetchOutcome::Stats(snapshot)),
            Some(ScriptedFetch::NotFound) | None => Ok(FetchOutcome::NotFound),
            Some(ScriptedFetch::Fail) => Err(FetchError {
                attempts: 3,
                cause: FetchCause::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            }),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}
