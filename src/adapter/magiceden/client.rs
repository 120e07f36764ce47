//! Magic Eden REST client with retry/backoff and a metadata cache.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use reqwest::Client as HttpClient;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::dto::{CollectionDto, CollectionsResponse};
use crate::config::{FetchConfig, NetworkConfig};
use crate::domain::{CollectionAddress, CollectionMetadata, StatsSnapshot};
use crate::error::{FetchCause, FetchError};
use crate::port::{FetchOutcome, StatsProvider};

/// HTTP client for the Magic Eden `collections/v7` API.
///
/// Owns the retry/backoff discipline for the unreliable upstream and a
/// cross-call metadata cache (name/image/description), populated on the
/// first successful fetch and refreshed only on explicit request. It never
/// touches the snapshot store or the dedup cache.
pub struct MagicEdenClient {
    http: HttpClient,
    base_url: String,
    chain: String,
    retry_max_attempts: u32,
    retry_base_delay: Duration,
    metadata: DashMap<CollectionAddress, CollectionMetadata>,
}

impl MagicEdenClient {
    /// Create a client with default retry settings (3 attempts, 1s base).
    #[must_use]
    pub fn new(base_url: String, chain: String) -> Self {
        Self {
            http: HttpClient::new(),
            base_url,
            chain,
            retry_max_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            metadata: DashMap::new(),
        }
    }

    #[must_use]
    pub fn from_config(network: &NetworkConfig, fetch: &FetchConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(fetch.timeout_ms))
            .connect_timeout(Duration::from_millis(fetch.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: network.api_url.clone(),
            chain: network.chain.clone(),
            retry_max_attempts: fetch.retry_max_attempts,
            retry_base_delay: Duration::from_millis(fetch.retry_base_delay_ms),
            metadata: DashMap::new(),
        }
    }

    fn collection_url(&self, address: &CollectionAddress) -> String {
        format!(
            "{}/v3/rtp/{}/collections/v7?id={}",
            self.base_url, self.chain, address
        )
    }

    async fn get_with_retry(&self, url: &str) -> Result<CollectionsResponse, FetchError> {
        let max_attempts = self.retry_max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.try_get(url).await {
                Ok(response) => return Ok(response),
                Err(cause) => {
                    if attempt >= max_attempts {
                        return Err(FetchError {
                            attempts: attempt,
                            cause,
                        });
                    }
                    // 1s, 2s, 4s, ... - doubling from the base delay.
                    let delay = self.retry_base_delay * 2u32.saturating_pow(attempt - 1);
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %cause,
                        "Stats fetch failed, retrying"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    async fn try_get(&self, url: &str) -> Result<CollectionsResponse, FetchCause> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchCause::Status(status));
        }
        Ok(response.json::<CollectionsResponse>().await?)
    }

    /// Cached display metadata for a collection, if any fetch has seen it.
    #[must_use]
    pub fn metadata(&self, address: &CollectionAddress) -> Option<CollectionMetadata> {
        self.metadata.get(address).map(|entry| entry.clone())
    }

    /// Whether the metadata cache has nothing better than a placeholder.
    #[must_use]
    pub fn needs_metadata_refresh(&self, address: &CollectionAddress) -> bool {
        self.metadata
            .get(address)
            .map_or(true, |entry| entry.is_placeholder())
    }

    /// Re-fetch and overwrite cached metadata for one collection.
    ///
    /// The automatic cache is insert-only; this is the explicit refresh
    /// path for entries that are missing or still address-derived.
    pub async fn refresh_metadata(
        &self,
        address: &CollectionAddress,
    ) -> Result<Option<CollectionMetadata>, FetchError> {
        let url = self.collection_url(address);
        let response = self.get_with_retry(&url).await?;

        match response.collections.into_iter().next() {
            Some(dto) => {
                let meta = metadata_from_dto(address, &dto);
                self.metadata.insert(address.clone(), meta.clone());
                Ok(Some(meta))
            }
            None => Ok(None),
        }
    }

    fn cache_metadata(&self, address: &CollectionAddress, meta: CollectionMetadata) {
        // First write wins; explicit refresh is the only overwrite path.
        self.metadata.entry(address.clone()).or_insert(meta);
    }
}

#[async_trait]
impl StatsProvider for MagicEdenClient {
    async fn fetch_stats(
        &self,
        address: &CollectionAddress,
    ) -> Result<FetchOutcome, FetchError> {
        let url = self.collection_url(address);
        debug!(collection = %address, url = %url, "Fetching collection stats");

        let response = self.get_with_retry(&url).await?;

        let Some(dto) = response.collections.into_iter().next() else {
            debug!(collection = %address, "No upstream record for collection");
            self.cache_metadata(address, CollectionMetadata::placeholder(address));
            return Ok(FetchOutcome::NotFound);
        };

        self.cache_metadata(address, metadata_from_dto(address, &dto));

        Ok(FetchOutcome::Stats(StatsSnapshot {
            volume: dto.volume_1day(),
            floor_price: dto.floor_1day(),
            sales_count: dto.sales_count_or_zero(),
            observed_at: Utc::now(),
        }))
    }

    fn provider_name(&self) -> &'static str {
        "magiceden"
    }
}

fn metadata_from_dto(address: &CollectionAddress, dto: &CollectionDto) -> CollectionMetadata {
    match &dto.name {
        Some(name) => CollectionMetadata::fetched(
            name.clone(),
            dto.image.clone(),
            dto.description.clone(),
            dto.floor_1day(),
        ),
        // A record without a name stays eligible for explicit refresh.
        None => CollectionMetadata::placeholder(address),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn client() -> MagicEdenClient {
        MagicEdenClient::new(
            "https://api-mainnet.magiceden.dev".into(),
            "monad-testnet".into(),
        )
    }

    #[test]
    fn collection_url_includes_chain_and_id() {
        let addr = CollectionAddress::new("0xaa");
        assert_eq!(
            client().collection_url(&addr),
            "https://api-mainnet.magiceden.dev/v3/rtp/monad-testnet/collections/v7?id=0xaa"
        );
    }

    #[test]
    fn provider_name_is_stable() {
        assert_eq!(client().provider_name(), "magiceden");
    }

    #[test]
    fn metadata_from_dto_maps_fields() {
        let dto: CollectionDto = serde_json::from_str(
            r#"{"name": "Monad Punks", "image": "https://img.example/p.png",
                "description": "desc", "floorSale": {"1day": 0.8}}"#,
        )
        .unwrap();

        let meta = metadata_from_dto(&CollectionAddress::new("0xaa"), &dto);
        assert_eq!(meta.name, "Monad Punks");
        assert_eq!(meta.image.as_deref(), Some("https://img.example/p.png"));
        assert_eq!(meta.floor_price, Some(dec!(0.8)));
        assert!(!meta.is_placeholder());
    }

    #[test]
    fn metadata_from_dto_falls_back_to_placeholder_name() {
        let dto: CollectionDto = serde_json::from_str("{}").unwrap();
        let addr = CollectionAddress::new("0x1234567890abcdef1234567890abcdef12345678");

        let meta = metadata_from_dto(&addr, &dto);
        assert!(meta.is_placeholder());
    }

    #[test]
    fn metadata_cache_first_write_wins() {
        let c = client();
        let addr = CollectionAddress::new("0xaa");

        c.cache_metadata(&addr, CollectionMetadata::placeholder(&addr));
        c.cache_metadata(
            &addr,
            CollectionMetadata::fetched("Real Name".into(), None, None, None),
        );

        assert!(c.metadata(&addr).unwrap().is_placeholder());
        assert!(c.needs_metadata_refresh(&addr));
    }

    #[test]
    fn placeholder_like_fetched_name_is_not_refreshed() {
        let c = client();
        let addr = CollectionAddress::new("0xaa");

        c.cache_metadata(
            &addr,
            CollectionMetadata::fetched("Collection Zero".into(), None, None, None),
        );

        assert!(!c.needs_metadata_refresh(&addr));
    }

    #[test]
    fn missing_metadata_needs_refresh() {
        assert!(client().needs_metadata_refresh(&CollectionAddress::new("0xaa")));
    }
}
