//! Configuration loading and validation.

use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::{ColdStart, CollectionAddress, SubscriberId};
use crate::error::{ConfigError, Result};
use crate::port::StaticRegistry;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub fetch: FetchConfig,
    pub poller: PollerConfig,
    pub dedup: DedupConfig,
    pub logging: LoggingConfig,
    /// Per-subscriber tracked collections. Owned by the external
    /// configuration layer in a full deployment; inlined here for the
    /// standalone binary.
    pub subscribers: Vec<SubscriberConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub api_url: String,
    pub chain: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    pub interval_secs: u64,
    pub max_concurrent_fetches: usize,
    pub cold_start: ColdStart,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub per_entity_cap: usize,
    pub retention_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriberConfig {
    pub id: String,
    pub collections: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api-mainnet.magiceden.dev".into(),
            chain: "monad-testnet".into(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
            retry_max_attempts: 3,
            retry_base_delay_ms: 1_000,
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            max_concurrent_fetches: 4,
            cold_start: ColdStart::Quiet,
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            per_entity_cap: 50,
            retention_secs: 3_600,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            fetch: FetchConfig::default(),
            poller: PollerConfig::default(),
            dedup: DedupConfig::default(),
            logging: LoggingConfig::default(),
            subscribers: Vec::new(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.network.api_url).map_err(|e| ConfigError::InvalidValue {
            field: "network.api_url",
            reason: e.to_string(),
        })?;

        if self.network.chain.is_empty() {
            return Err(ConfigError::MissingField {
                field: "network.chain",
            }
            .into());
        }
        if self.poller.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poller.interval_secs",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.poller.max_concurrent_fetches == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poller.max_concurrent_fetches",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.dedup.per_entity_cap == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dedup.per_entity_cap",
                reason: "must be positive".into(),
            }
            .into());
        }

        for subscriber in &self.subscribers {
            if subscriber.id.is_empty() {
                return Err(ConfigError::MissingField {
                    field: "subscribers.id",
                }
                .into());
            }
            for collection in &subscriber.collections {
                CollectionAddress::parse(collection).map_err(|e| ConfigError::InvalidValue {
                    field: "subscribers.collections",
                    reason: e.to_string(),
                })?;
            }
        }

        Ok(())
    }

    /// Build the tracked-collection registry from the inlined subscriber
    /// tables. Addresses were validated in [`Config::load`].
    pub fn registry(&self) -> Result<StaticRegistry> {
        let mut entries = Vec::with_capacity(self.subscribers.len());
        for subscriber in &self.subscribers {
            let collections = subscriber
                .collections
                .iter()
                .map(|c| CollectionAddress::parse(c))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            entries.push((SubscriberId::new(subscriber.id.clone()), collections));
        }
        Ok(StaticRegistry::new(entries))
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp config");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_match_documented_constants() {
        let config = Config::default();
        assert_eq!(config.fetch.timeout_ms, 10_000);
        assert_eq!(config.fetch.retry_max_attempts, 3);
        assert_eq!(config.dedup.per_entity_cap, 50);
        assert_eq!(config.dedup.retention_secs, 3_600);
        assert_eq!(config.poller.cold_start, ColdStart::Quiet);
    }

    #[test]
    fn empty_file_loads_defaults() {
        let file = write_config("");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.poller.interval_secs, 60);
        assert!(config.subscribers.is_empty());
    }

    #[test]
    fn full_file_overrides_defaults() {
        let file = write_config(
            r#"
            [network]
            api_url = "https://api.example.dev"
            chain = "monad-mainnet"

            [poller]
            interval_secs = 30
            cold_start = "notify"

            [dedup]
            per_entity_cap = 20
            retention_secs = 600

            [[subscribers]]
            id = "guild-1"
            collections = ["0x00000000000000000000000000000000000000aa"]
            "#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.network.chain, "monad-mainnet");
        assert_eq!(config.poller.interval_secs, 30);
        assert_eq!(config.poller.cold_start, ColdStart::Notify);
        assert_eq!(config.dedup.per_entity_cap, 20);
        assert_eq!(config.subscribers.len(), 1);
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let file = write_config("[network]\napi_url = \"not a url\"\n");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let file = write_config("[poller]\ninterval_secs = 0\n");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn malformed_tracked_address_is_rejected() {
        let file = write_config(
            "[[subscribers]]\nid = \"g\"\ncollections = [\"0x123\"]\n",
        );
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn registry_resolves_marketplace_urls() {
        let file = write_config(
            r#"
            [[subscribers]]
            id = "guild-1"
            collections = ["https://magiceden.io/collections/monad-testnet/0x00000000000000000000000000000000000000aa"]
            "#,
        );

        let config = Config::load(file.path()).unwrap();
        let registry = config.registry().unwrap();
        let tracked = crate::port::TrackedRegistry::list_tracked(
            &registry,
            &SubscriberId::new("guild-1"),
        );
        assert_eq!(
            tracked[0].as_str(),
            "0x00000000000000000000000000000000000000aa"
        );
    }
}
