//! Sale inference from snapshot deltas.
//!
//! The upstream has no per-sale feed, so any upward movement in aggregate
//! volume or sales count is taken as evidence that at least one sale
//! happened since the last poll. The engine deliberately under-reports:
//! multiple sales inside one interval collapse into a single event rather
//! than guessing a count it cannot verify.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CollectionAddress, SaleEvent, SaleId, SourceMetrics, StatsSnapshot};

/// What to do with the first observation of a collection after a restart.
///
/// Dedup state is volatile by design, so a restart forgets everything. With
/// `Quiet` the first observation only establishes a baseline; with `Notify`
/// it is compared against a zero snapshot, so activity reflected in the
/// first post-restart stats is notified once (catch-up at the risk of a
/// duplicate for anything notified before the restart).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColdStart {
    #[default]
    Quiet,
    Notify,
}

/// Compare two snapshots and synthesize at most one sale event.
///
/// Returns `None` when `previous` is absent (baseline, under
/// [`ColdStart::Quiet`]) or when neither volume nor sales count increased.
/// The sale id is derived from `(address, current.observed_at)`, so
/// re-running inference against the same snapshot pair is idempotent.
#[must_use]
pub fn infer(
    address: &CollectionAddress,
    previous: Option<&StatsSnapshot>,
    current: &StatsSnapshot,
    cold_start: ColdStart,
) -> Option<SaleEvent> {
    let zero_baseline;
    let previous = match (previous, cold_start) {
        (Some(prev), _) => prev,
        (None, ColdStart::Quiet) => return None,
        (None, ColdStart::Notify) => {
            zero_baseline = StatsSnapshot {
                volume: Decimal::ZERO,
                floor_price: None,
                sales_count: 0,
                observed_at: current.observed_at,
            };
            &zero_baseline
        }
    };

    let volume_delta = current.volume - previous.volume;
    // Checked u64 subtraction, saturating at the i64 bounds: a cast must
    // never turn a decrease into an apparent increase.
    let sales_count_delta = if current.sales_count >= previous.sales_count {
        i64::try_from(current.sales_count - previous.sales_count).unwrap_or(i64::MAX)
    } else {
        i64::try_from(previous.sales_count - current.sales_count).map_or(i64::MIN, |d| -d)
    };

    if volume_delta <= Decimal::ZERO && sales_count_delta <= 0 {
        return None;
    }

    // Price estimate: the volume delta when it moved, else the current
    // floor, else unknown. Never a fabricated number.
    let estimated_price = if volume_delta > Decimal::ZERO {
        Some(volume_delta)
    } else {
        current.floor_price
    };

    Some(SaleEvent {
        collection: address.clone(),
        sale_id: SaleId::derive(address, current.observed_at),
        estimated_price,
        inferred_at: current.observed_at,
        metrics: SourceMetrics {
            volume_delta,
            sales_count_delta,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn snap(volume: Decimal, sales_count: u64) -> StatsSnapshot {
        StatsSnapshot {
            volume,
            floor_price: None,
            sales_count,
            observed_at: at(),
        }
    }

    fn addr() -> CollectionAddress {
        CollectionAddress::new("0xaa")
    }

    #[test]
    fn absent_previous_is_baseline_only() {
        let current = snap(dec!(1000), 42);
        assert!(infer(&addr(), None, &current, ColdStart::Quiet).is_none());
    }

    #[test]
    fn unchanged_stats_produce_no_event() {
        let prev = snap(dec!(10), 1);
        let curr = snap(dec!(10), 1);
        assert!(infer(&addr(), Some(&prev), &curr, ColdStart::Quiet).is_none());
    }

    #[test]
    fn volume_and_count_increase_produces_one_event() {
        let prev = snap(dec!(10), 1);
        let mut curr = snap(dec!(12.5), 2);
        curr.observed_at = at() + Duration::seconds(60);

        let event = infer(&addr(), Some(&prev), &curr, ColdStart::Quiet).unwrap();
        assert_eq!(event.estimated_price, Some(dec!(2.5)));
        assert_eq!(event.metrics.volume_delta, dec!(2.5));
        assert_eq!(event.metrics.sales_count_delta, 1);
    }

    #[test]
    fn count_increase_alone_triggers_with_floor_fallback() {
        let prev = snap(dec!(10), 1);
        let mut curr = snap(dec!(10), 2);
        curr.floor_price = Some(dec!(0.8));

        let event = infer(&addr(), Some(&prev), &curr, ColdStart::Quiet).unwrap();
        assert_eq!(event.estimated_price, Some(dec!(0.8)));
        assert_eq!(event.metrics.sales_count_delta, 1);
    }

    #[test]
    fn count_increase_without_floor_leaves_price_unknown() {
        let prev = snap(dec!(10), 1);
        let curr = snap(dec!(10), 2);

        let event = infer(&addr(), Some(&prev), &curr, ColdStart::Quiet).unwrap();
        assert_eq!(event.estimated_price, None);
    }

    #[test]
    fn sales_count_delta_saturates_instead_of_wrapping() {
        let prev = snap(dec!(10), 0);
        let curr = snap(dec!(10), u64::MAX);

        let event = infer(&addr(), Some(&prev), &curr, ColdStart::Quiet).unwrap();
        assert_eq!(event.metrics.sales_count_delta, i64::MAX);
    }

    #[test]
    fn huge_count_decrease_is_not_misread_as_increase() {
        let prev = snap(dec!(10), u64::MAX);
        let curr = snap(dec!(10), 1);

        assert!(infer(&addr(), Some(&prev), &curr, ColdStart::Quiet).is_none());
    }

    #[test]
    fn decreasing_stats_produce_no_event() {
        // 1-day windows roll over; a shrinking window is not a sale.
        let prev = snap(dec!(10), 5);
        let curr = snap(dec!(7), 3);
        assert!(infer(&addr(), Some(&prev), &curr, ColdStart::Quiet).is_none());
    }

    #[test]
    fn replayed_snapshot_pair_yields_same_sale_id() {
        let prev = snap(dec!(10), 1);
        let curr = snap(dec!(12), 2);

        let first = infer(&addr(), Some(&prev), &curr, ColdStart::Quiet).unwrap();
        let second = infer(&addr(), Some(&prev), &curr, ColdStart::Quiet).unwrap();
        assert_eq!(first.sale_id, second.sale_id);
    }

    #[test]
    fn cold_start_notify_reports_first_observation_once() {
        let curr = snap(dec!(25), 3);

        let event = infer(&addr(), None, &curr, ColdStart::Notify).unwrap();
        assert_eq!(event.estimated_price, Some(dec!(25)));
        assert_eq!(event.metrics.sales_count_delta, 3);
    }

    #[test]
    fn cold_start_notify_is_quiet_for_inactive_collections() {
        let curr = snap(dec!(0), 0);
        assert!(infer(&addr(), None, &curr, ColdStart::Notify).is_none());
    }
}
