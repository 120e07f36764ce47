//! Core domain types and logic, free of I/O.
//!
//! Everything here is synchronous and deterministic: snapshot comparison,
//! sale inference, and the dedup cache all take explicit timestamps so
//! tests control the clock.

mod dedup;
mod id;
mod inference;
mod metadata;
mod sale;
mod snapshot;

pub use dedup::DedupCache;
pub use id::{CollectionAddress, SaleId, SubscriberId};
pub use inference::{infer, ColdStart};
pub use metadata::CollectionMetadata;
pub use sale::{SaleEvent, SourceMetrics};
pub use snapshot::{SnapshotStore, StatsSnapshot};
