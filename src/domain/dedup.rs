//! Bounded, time-aware cache of already-notified sale identifiers.
//!
//! The admission gate before any notification is emitted: once a sale id is
//! marked seen, every later check within the retention horizon reports it
//! as seen. That is the single property the rest of the system relies on
//! to avoid duplicate notifications.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};

use super::{CollectionAddress, SaleId};

/// Per-collection seen-set with insertion order preserved for eviction.
#[derive(Debug, Default)]
struct SeenEntries {
    /// Insertion order; front is oldest. FIFO, not LRU - lookups never
    /// refresh recency because a sale id is only checked before being
    /// marked and never again in steady state.
    order: VecDeque<SaleId>,
    first_seen: HashMap<SaleId, DateTime<Utc>>,
}

impl SeenEntries {
    fn mark(&mut self, sale_id: SaleId, now: DateTime<Utc>, cap: usize) {
        if self.first_seen.contains_key(&sale_id) {
            // Idempotent: the first-seen timestamp is never refreshed.
            return;
        }
        self.order.push_back(sale_id.clone());
        self.first_seen.insert(sale_id, now);

        while self.order.len() > cap {
            if let Some(oldest) = self.order.pop_front() {
                self.first_seen.remove(&oldest);
            }
        }
    }

    fn purge_expired(&mut self, cutoff: DateTime<Utc>) {
        // Entries sit in first-seen order, so expired ones cluster at the
        // front and the scan stops at the first live entry.
        while let Some(front) = self.order.front() {
            let expired = self
                .first_seen
                .get(front)
                .is_some_and(|first_seen| *first_seen < cutoff);
            if !expired {
                break;
            }
            if let Some(id) = self.order.pop_front() {
                self.first_seen.remove(&id);
            }
        }
    }
}

/// Per-collection bounded cache of already-notified sale ids.
///
/// Capacity eviction is oldest-first per collection; independent of
/// capacity, entries older than the retention horizon are purged at the
/// start of every cycle so memory stays bounded even for collections that
/// rarely sell. Volatile across restarts by design.
#[derive(Debug)]
pub struct DedupCache {
    per_entity_cap: usize,
    retention: Duration,
    entries: HashMap<CollectionAddress, SeenEntries>,
}

impl DedupCache {
    #[must_use]
    pub fn new(per_entity_cap: usize, retention: Duration) -> Self {
        Self {
            per_entity_cap: per_entity_cap.max(1),
            retention,
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn has_seen(&self, address: &CollectionAddress, sale_id: &SaleId) -> bool {
        self.entries
            .get(address)
            .is_some_and(|seen| seen.first_seen.contains_key(sale_id))
    }

    /// Record a sale id as notified. Idempotent.
    pub fn mark_seen(&mut self, address: &CollectionAddress, sale_id: SaleId, now: DateTime<Utc>) {
        self.entries
            .entry(address.clone())
            .or_default()
            .mark(sale_id, now, self.per_entity_cap);
    }

    /// Drop entries older than the retention horizon, regardless of
    /// capacity pressure. Called at the start of every poll cycle.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.retention;
        for seen in self.entries.values_mut() {
            seen.purge_expired(cutoff);
        }
        self.entries.retain(|_, seen| !seen.order.is_empty());
    }

    /// Number of remembered sale ids for one collection.
    #[must_use]
    pub fn entry_count(&self, address: &CollectionAddress) -> usize {
        self.entries
            .get(address)
            .map_or(0, |seen| seen.order.len())
    }
}
