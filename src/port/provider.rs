//! Stats provider port - the only network dependency of the core.

use async_trait::async_trait;

use crate::domain::{CollectionAddress, StatsSnapshot};
use crate::error::FetchError;

/// Result of a successful upstream stats request.
///
/// `NotFound` is a first-class outcome, not an error: the collection is a
/// valid tracking target but the upstream has no record of it, and that
/// must never be mistaken for a sale-relevant stats change.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Stats(StatsSnapshot),
    NotFound,
}

/// Retrieves current aggregate stats for one tracked collection.
///
/// Implementations own their timeout and retry discipline; a returned
/// [`FetchError`] means the retry budget is exhausted and the caller's
/// stored snapshot must stay untouched.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    async fn fetch_stats(
        &self,
        address: &CollectionAddress,
    ) -> Result<FetchOutcome, FetchError>;

    fn provider_name(&self) -> &'static str;
}
