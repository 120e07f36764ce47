//! Display metadata for tracked collections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CollectionAddress;

/// Name/image/description for a collection, cached by the stats fetcher.
///
/// Populated on the first successful fetch and never invalidated
/// automatically; external layers trigger an explicit refresh when an
/// entry is missing or still a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub floor_price: Option<Decimal>,
    /// Whether the name is an address-derived stand-in rather than a
    /// fetched one. Tracked explicitly because fetched names are
    /// arbitrary strings and cannot be distinguished by inspection.
    placeholder: bool,
}

impl CollectionMetadata {
    /// Metadata carrying a name fetched from the upstream.
    #[must_use]
    pub fn fetched(
        name: String,
        image: Option<String>,
        description: Option<String>,
        floor_price: Option<Decimal>,
    ) -> Self {
        Self {
            name,
            image,
            description,
            floor_price,
            placeholder: false,
        }
    }

    /// Address-derived stand-in used when the upstream has no record yet.
    #[must_use]
    pub fn placeholder(address: &CollectionAddress) -> Self {
        Self {
            name: format!("Collection {}", address.short()),
            image: None,
            description: None,
            floor_price: None,
            placeholder: true,
        }
    }

    /// Whether this entry still carries an address-derived placeholder name.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}
