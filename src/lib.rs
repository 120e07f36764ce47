//! Salewatch - NFT sale inference from marketplace stats polling.
//!
//! Magic Eden exposes no per-sale event feed for Monad collections, so this
//! crate infers sales from deltas in aggregate collection stats: each poll
//! cycle fetches the current stats per tracked collection, compares them
//! against the last observed snapshot, and synthesizes at most one sale
//! event per collection when volume or sale count moved up. A bounded,
//! time-aware dedup cache guarantees each inferred sale is notified at most
//! once despite repeated polling.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Snapshots, sale events, the inference engine, dedup cache
//! - [`error`] - Error types for the crate
//! - [`port`] - Trait seams: stats provider, tracked registry, notification sink
//! - [`adapter`] - Magic Eden REST implementation of the stats provider
//! - [`app`] - Poll cycle coordination and the interval runner
//!
//! The chat-platform surface (slash commands, embeds, channel routing) is an
//! external collaborator: it consumes [`port::NotificationSink`] deliveries
//! and owns the tracked-collection registry. The core has no opinion on it.

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
