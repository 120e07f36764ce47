//! Tracked-collection registry port.
//!
//! The registry is owned by the external configuration layer (per-guild
//! tracked lists in the original deployment); the core only reads it.

use std::collections::BTreeMap;

use crate::domain::{CollectionAddress, SubscriberId};

/// Supplies the per-subscriber tracking set each cycle. Never mutated by
/// the core.
pub trait TrackedRegistry: Send + Sync {
    /// All known subscribers.
    fn subscribers(&self) -> Vec<SubscriberId>;

    /// Collections the given subscriber wants notifications for.
    fn list_tracked(&self, subscriber: &SubscriberId) -> Vec<CollectionAddress>;
}

/// Fixed in-memory registry, built from configuration at startup.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    tracked: BTreeMap<SubscriberId, Vec<CollectionAddress>>,
}

impl StaticRegistry {
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (SubscriberId, Vec<CollectionAddress>)>) -> Self {
        Self {
            tracked: entries.into_iter().collect(),
        }
    }
}

impl TrackedRegistry for StaticRegistry {
    fn subscribers(&self) -> Vec<SubscriberId> {
        self.tracked.keys().cloned().collect()
    }

    fn list_tracked(&self, subscriber: &SubscriberId) -> Vec<CollectionAddress> {
        self.tracked.get(subscriber).cloned().unwrap_or_default()
    }
}
