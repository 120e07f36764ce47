//! Synthetic sale events inferred from stat deltas.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CollectionAddress, SaleId};

/// The stat movement that triggered an inferred sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetrics {
    pub volume_delta: Decimal,
    pub sales_count_delta: i64,
}

/// An inferred, not directly observed, sale.
///
/// Created by the inference engine, consumed exactly once by the dedup
/// cache and the notification sink; never mutated. The price is a derived
/// estimate (volume delta, falling back to floor price), not ground truth;
/// `None` means no honest estimate exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEvent {
    pub collection: CollectionAddress,
    pub sale_id: SaleId,
    pub estimated_price: Option<Decimal>,
    pub inferred_at: DateTime<Utc>,
    pub metrics: SourceMetrics,
}
