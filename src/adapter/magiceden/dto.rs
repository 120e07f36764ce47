//! Wire types for the Magic Eden `collections/v7` endpoint.
//!
//! Response shape (trimmed):
//!
//! ```json
//! {
//!   "collections": [{
//!     "name": "...", "image": "...", "description": "...",
//!     "volume": { "1day": 12.5 },
//!     "floorSale": { "1day": 0.8 },
//!     "salesCount": 42,
//!     "ownerCount": 310,
//!     "updatedAt": "2025-03-01T12:00:00.000Z"
//!   }]
//! }
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level response; an empty `collections` array means the queried id
/// is unknown to the marketplace.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionsResponse {
    #[serde(default)]
    pub collections: Vec<CollectionDto>,
}

/// Per-window stat buckets keyed by window name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowStats {
    #[serde(rename = "1day")]
    pub one_day: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDto {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub volume: Option<WindowStats>,
    #[serde(default)]
    pub floor_sale: Option<WindowStats>,
    #[serde(default)]
    pub sales_count: Option<u64>,
    #[serde(default)]
    pub owner_count: Option<u64>,
    pub updated_at: Option<String>,
}

impl CollectionDto {
    /// 1-day volume as a decimal; missing or non-finite values map to zero
    /// so a gap in the upstream window never looks like negative movement.
    #[must_use]
    pub fn volume_1day(&self) -> Decimal {
        self.volume
            .as_ref()
            .and_then(|w| w.one_day)
            .and_then(|v| Decimal::try_from(v).ok())
            .unwrap_or(Decimal::ZERO)
    }

    /// 1-day floor sale price, when reported.
    #[must_use]
    pub fn floor_1day(&self) -> Option<Decimal> {
        self.floor_sale
            .as_ref()
            .and_then(|w| w.one_day)
            .and_then(|v| Decimal::try_from(v).ok())
    }

    #[must_use]
    pub fn sales_count_or_zero(&self) -> u64 {
        self.sales_count.unwrap_or(0)
    }
}
