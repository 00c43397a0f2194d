//! Layered configuration: built-in defaults, then `config/default.toml`, then an
//! optional file passed on the command line, then `DEPTHX__*` environment
//! variables (`DEPTHX__CACHE__TTL_SECS=30`).

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::market_data::adapters::VenueKind;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub fetch: FetchConfig,
    pub cache: CacheConfig,
    pub log: LogConfig,
    #[serde(default = "default_venues")]
    pub venues: Vec<VenueConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub timeout_ms: u64,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub filter: String,
}

/// One entry of the ordered venue list. Order matters: it breaks price ties
/// when books are merged.
#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    pub kind: VenueKind,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub depth_limit: Option<u32>,
    // per-venue cache overrides
    #[serde(default)]
    pub ttl_secs: Option<u64>,
    #[serde(default)]
    pub max_entries: Option<usize>,
}

impl VenueConfig {
    pub fn of(kind: VenueKind) -> Self {
        Self {
            kind,
            id: None,
            name: None,
            base_url: None,
            depth_limit: None,
            ttl_secs: None,
            max_entries: None,
        }
    }

    pub fn ttl(&self, cache: &CacheConfig) -> Duration {
        Duration::from_secs(self.ttl_secs.unwrap_or(cache.ttl_secs))
    }

    pub fn max_entries(&self, cache: &CacheConfig) -> usize {
        self.max_entries.unwrap_or(cache.max_entries)
    }
}

fn default_venues() -> Vec<VenueConfig> {
    vec![
        VenueConfig::of(VenueKind::Binance),
        VenueConfig::of(VenueKind::Bybit),
        VenueConfig::of(VenueKind::Hyperliquid),
    ]
}

impl AppConfig {
    pub fn load(extra: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server.bind", "0.0.0.0:8000")?
            .set_default("fetch.timeout_ms", 5000)?
            .set_default("cache.ttl_secs", 60)?
            .set_default("cache.max_entries", 50)?
            .set_default("log.filter", "info,depthx=debug")?
            .add_source(File::with_name("config/default").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix("DEPTHX").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config.try_deserialize().context("Failed to deserialize configuration")
    }
}
