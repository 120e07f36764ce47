//! Last-observed stats snapshots per tracked collection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CollectionAddress;

/// Aggregate stats for one collection at one observation point.
///
/// Replaced wholesale on every successful fetch; a failed fetch leaves the
/// previous snapshot in place (stale-but-valid data beats no data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// 1-day trading volume reported by the marketplace.
    pub volume: Decimal,
    /// 1-day floor sale price, when the marketplace reports one.
    pub floor_price: Option<Decimal>,
    /// Cumulative sales count reported by the marketplace.
    pub sales_count: u64,
    /// When this snapshot was observed (local fetch completion time).
    pub observed_at: DateTime<Utc>,
}

/// Holds the last-observed snapshot per tracked collection.
///
/// One entry per tracked collection, bounded by the subscription count;
/// no eviction. Owned by the poll cycle coordinator - nothing else
/// writes to it.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: HashMap<CollectionAddress, StatsSnapshot>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, address: &CollectionAddress) -> Option<&StatsSnapshot> {
        self.snapshots.get(address)
    }

    /// Store a snapshot, keeping `observed_at` monotonic per collection.
    ///
    /// A snapshot is only replaced by a strictly newer observation; returns
    /// whether the store changed. Replaying a fetch with an identical
    /// observation time leaves the stored baseline untouched, which is what
    /// lets a crashed-and-replayed cycle re-derive the same sale id.
    pub fn put(&mut self, address: CollectionAddress, snapshot: StatsSnapshot) -> bool {
        match self.snapshots.get(&address) {
            Some(existing) if existing.observed_at >= snapshot.observed_at => false,
            _ => {
                self.snapshots.insert(address, snapshot);
                true
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn snap(volume: Decimal, at: DateTime<Utc>) -> StatsSnapshot {
        StatsSnapshot {
            volume,
            floor_price: None,
            sales_count: 0,
            observed_at: at,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn get_returns_absent_for_unknown_collection() {
        let store = SnapshotStore::new();
        assert!(store.get(&CollectionAddress::new("0xaa")).is_none());
    }

    #[test]
    fn put_inserts_first_observation() {
        let mut store = SnapshotStore::new();
        let addr = CollectionAddress::new("0xaa");

        assert!(store.put(addr.clone(), snap(dec!(10), t0())));
        assert_eq!(store.get(&addr).unwrap().volume, dec!(10));
    }

    #[test]
    fn put_replaces_with_newer_observation() {
        let mut store = SnapshotStore::new();
        let addr = CollectionAddress::new("0xaa");
        store.put(addr.clone(), snap(dec!(10), t0()));

        assert!(store.put(addr.clone(), snap(dec!(12), t0() + Duration::seconds(60))));
        assert_eq!(store.get(&addr).unwrap().volume, dec!(12));
    }

    #[test]
    fn put_rejects_stale_and_equal_observations() {
        let mut store = SnapshotStore::new();
        let addr = CollectionAddress::new("0xaa");
        store.put(addr.clone(), snap(dec!(10), t0()));

        assert!(!store.put(addr.clone(), snap(dec!(99), t0())));
        assert!(!store.put(addr.clone(), snap(dec!(99), t0() - Duration::seconds(1))));
        assert_eq!(store.get(&addr).unwrap().volume, dec!(10));
    }

    #[test]
    fn one_entry_per_collection() {
        let mut store = SnapshotStore::new();
        let addr = CollectionAddress::new("0xaa");
        for i in 0..5 {
            store.put(addr.clone(), snap(dec!(1), t0() + Duration::seconds(i)));
        }
        assert_eq!(store.len(), 1);
    }
}
