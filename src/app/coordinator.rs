//! Poll cycle orchestration.
//!
//! One coordinator owns all mutable cycle state (snapshots, dedup cache)
//! and drives each cycle through the same fixed order: purge expired dedup
//! entries, fetch stats for every tracked collection, infer sales from the
//! deltas, gate them through the dedup cache, deliver to subscribers.
//! Admission happens before delivery, so a crash mid-delivery errs on the
//! side of a missed notification rather than a duplicate.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::{DedupConfig, PollerConfig};
use crate::domain::{
    infer, ColdStart, CollectionAddress, DedupCache, SaleEvent, SnapshotStore, SubscriberId,
};
use crate::error::FetchError;
use crate::port::{FetchOutcome, NotificationSink, StatsProvider, TrackedRegistry};

/// The union of all tracked collections for one cycle, inverted to map
/// each collection to the subscribers tracking it. A collection tracked by
/// several subscribers is fetched once and fanned out.
#[derive(Debug, Default)]
pub struct TrackingPlan {
    subscribers_by_collection: HashMap<CollectionAddress, Vec<SubscriberId>>,
}

impl TrackingPlan {
    #[must_use]
    pub fn from_registry(registry: &dyn TrackedRegistry) -> Self {
        let mut subscribers_by_collection: HashMap<CollectionAddress, Vec<SubscriberId>> =
            HashMap::new();
        for subscriber in registry.subscribers() {
            for address in registry.list_tracked(&subscriber) {
                subscribers_by_collection
                    .entry(address)
                    .or_default()
                    .push(subscriber.clone());
            }
        }
        Self {
            subscribers_by_collection,
        }
    }

    pub fn collections(&self) -> impl Iterator<Item = &CollectionAddress> {
        self.subscribers_by_collection.keys()
    }

    #[must_use]
    pub fn subscribers_for(&self, address: &CollectionAddress) -> &[SubscriberId] {
        self.subscribers_by_collection
            .get(address)
            .map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers_by_collection.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers_by_collection.len()
    }
}

/// What one poll cycle did, for logging and tests.
///
/// `emitted` contains every inferred sale event, including ones the dedup
/// cache suppressed; only non-suppressed events reach the sink.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub emitted: Vec<SaleEvent>,
    pub delivered: usize,
    pub suppressed: usize,
    pub skipped: usize,
    pub delivery_failures: usize,
    pub errors: Vec<(CollectionAddress, FetchError)>,
}

pub struct Coordinator {
    provider: Arc<dyn StatsProvider>,
    sink: Arc<dyn NotificationSink>,
    snapshots: SnapshotStore,
    dedup: DedupCache,
    max_concurrent_fetches: usize,
    cold_start: ColdStart,
}

impl Coordinator {
    /// Coordinator with production defaults. Tests and the dry-run path
    /// use this; the binary goes through [`Coordinator::from_config`].
    #[must_use]
    pub fn new(provider: Arc<dyn StatsProvider>, sink: Arc<dyn NotificationSink>) -> Self {
        Self::from_config(provider, sink, &PollerConfig::default(), &DedupConfig::default())
    }

    #[must_use]
    pub fn from_config(
        provider: Arc<dyn StatsProvider>,
        sink: Arc<dyn NotificationSink>,
        poller: &PollerConfig,
        dedup: &DedupConfig,
    ) -> Self {
        Self {
            provider,
            sink,
            snapshots: SnapshotStore::new(),
            dedup: DedupCache::new(
                dedup.per_entity_cap,
                chrono::Duration::seconds(dedup.retention_secs as i64),
            ),
            max_concurrent_fetches: poller.max_concurrent_fetches.max(1),
            cold_start: poller.cold_start,
        }
    }

    /// Run one poll cycle over the plan.
    ///
    /// Fetches run concurrently up to the configured limit; inference,
    /// dedup and delivery run serially afterwards so cycle state needs no
    /// locking. A fetch failure for one collection never blocks the rest.
    pub async fn run_cycle(&mut self, plan: &TrackingPlan) -> CycleReport {
        let cycle_start = Utc::now();
        self.dedup.purge_expired(cycle_start);

        let mut report = CycleReport::default();
        if plan.is_empty() {
            debug!("No tracked collections, skipping cycle");
            return report;
        }

        let provider = Arc::clone(&self.provider);
        let outcomes = stream::iter(plan.collections().cloned())
            .map(|address| {
                let provider = Arc::clone(&provider);
                async move {
                    let outcome = provider.fetch_stats(&address).await;
                    (address, outcome)
                }
            })
            .buffer_unordered(self.max_concurrent_fetches)
            .collect::<Vec<_>>()
            .await;

        for (address, outcome) in outcomes {
            match outcome {
                Err(err) => {
                    warn!(collection = %address, error = %err, "Stats fetch failed for cycle");
                    report.errors.push((address, err));
                }
                Ok(FetchOutcome::NotFound) => {
                    debug!(collection = %address, "Collection unknown upstream, skipping");
                    report.skipped += 1;
                }
                Ok(FetchOutcome::Stats(snapshot)) => {
                    let event = infer(
                        &address,
                        self.snapshots.get(&address),
                        &snapshot,
                        self.cold_start,
                    );
                    self.snapshots.put(address.clone(), snapshot);

                    if let Some(event) = event {
                        self.dispatch(plan, &address, &event, &mut report).await;
                        report.emitted.push(event);
                    }
                }
            }
        }

        info!(
            collections = plan.len(),
            emitted = report.emitted.len(),
            delivered = report.delivered,
            suppressed = report.suppressed,
            skipped = report.skipped,
            delivery_failures = report.delivery_failures,
            errors = report.errors.len(),
            "Poll cycle complete"
        );
        report
    }

    async fn dispatch(
        &mut self,
        plan: &TrackingPlan,
        address: &CollectionAddress,
        event: &SaleEvent,
        report: &mut CycleReport,
    ) {
        if self.dedup.has_seen(address, &event.sale_id) {
            debug!(collection = %address, sale_id = %event.sale_id, "Duplicate sale suppressed");
            report.suppressed += 1;
            return;
        }

        // Admit before delivering: a sink failure must not cause a retry
        // storm for the same sale.
        self.dedup
            .mark_seen(address, event.sale_id.clone(), Utc::now());

        for subscriber in plan.subscribers_for(address) {
            match self.sink.deliver(event, subscriber).await {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    warn!(
                        collection = %address,
                        subscriber = %subscriber,
                        sink = err.sink,
                        error = %err,
                        "Notification delivery failed"
                    );
                    report.delivery_failures += 1;
                }
            }
        }
    }

    #[must_use]
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    #[must_use]
    pub fn dedup(&self) -> &DedupCache {
        &self.dedup
    }
}
