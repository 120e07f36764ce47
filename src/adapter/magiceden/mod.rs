//! Magic Eden REST adapter.

mod client;
mod dto;

pub use client::MagicEdenClient;
pub use dto::{CollectionDto, CollectionsResponse};
