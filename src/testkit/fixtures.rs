//! Shared fixture builders.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::{CollectionAddress, StatsSnapshot};

/// Fixed reference instant so tests control the clock.
#[must_use]
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).single().unwrap_or_default()
}

#[must_use]
pub fn addr(raw: &str) -> CollectionAddress {
    CollectionAddress::new(raw)
}

#[must_use]
pub fn snapshot_at(volume: Decimal, sales_count: u64, at: DateTime<Utc>) -> StatsSnapshot {
    StatsSnapshot {
        volume,
        floor_price: None,
        sales_count,
        observed_at: at,
    }
}

#[must_use]
pub fn snapshot_with_floor(
    volume: Decimal,
    sales_count: u64,
    floor: Decimal,
    at: DateTime<Utc>,
) -> StatsSnapshot {
    StatsSnapshot {
        floor_price: Some(floor),
        ..snapshot_at(volume, sales_count, at)
    }
}
