// Shared trait + error for venue adapters

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::config::VenueConfig;
use crate::engine::types::{OrderBook, Pair};

/// Everything that can go wrong talking to one venue. None of these escape
/// `ExchangeSource::fetch`; they decide whether to retry reversed or degrade.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("symbol {symbol} is not listed")]
    UnknownSymbol { symbol: String },
    #[error("transport: {0}")]
    Http(#[from] reqwest::Error),
    #[error("venue answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed payload: {0}")]
    Decode(String),
    #[error("no answer within {0:?}")]
    Timeout(Duration),
}

impl SourceError {
    pub fn unknown_symbol(symbol: impl Into<String>) -> Self {
        SourceError::UnknownSymbol { symbol: symbol.into() }
    }

    pub fn is_unknown_symbol(&self) -> bool {
        matches!(self, SourceError::UnknownSymbol { .. })
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Decode(e.to_string())
    }
}

/// One market venue that can hand over a depth snapshot on request.
///
/// Implementations report failures honestly; the fallback and degrade policy
/// lives in `ExchangeSource` so every venue gets the same treatment.
#[async_trait::async_trait]
pub trait VenueAdapter: Send + Sync {
    /// Stable identifier, used as `source_id` on every order and as the cache/metrics label.
    fn id(&self) -> &str;

    fn name(&self) -> Option<&str> {
        None
    }

    // Raw output, sides in whatever order the venue sent them
    async fn fetch_book(&self, pair: &Pair) -> Result<OrderBook, SourceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueKind {
    Binance,
    Bybit,
    Hyperliquid,
}

impl VenueKind {
    pub fn default_id(&self) -> &'static str {
        match self {
            VenueKind::Binance => "binance",
            VenueKind::Bybit => "bybit",
            VenueKind::Hyperliquid => "hyperliquid",
        }
    }

    pub fn default_name(&self) -> &'static str {
        match self {
            VenueKind::Binance => "Binance",
            VenueKind::Bybit => "Bybit",
            VenueKind::Hyperliquid => "Hyperliquid",
        }
    }
}

// The only place that knows about concrete venues
pub fn build(cfg: &VenueConfig, client: reqwest::Client) -> Arc<dyn VenueAdapter> {
    let id = cfg.id.clone().unwrap_or_else(|| cfg.kind.default_id().to_string());
    let name = Some(cfg.name.clone().unwrap_or_else(|| cfg.kind.default_name().to_string()));

    match cfg.kind {
        VenueKind::Binance => {
            let mut adapter = binance::BinanceAdapter::new(client, id, name);
            if let Some(url) = &cfg.base_url {
                adapter = adapter.with_base_url(url);
            }
            if let Some(limit) = cfg.depth_limit {
                adapter = adapter.with_depth_limit(limit);
            }
            Arc::new(adapter)
        }
        VenueKind::Bybit => {
            let mut adapter = bybit::BybitAdapter::new(client, id, name);
            if let Some(url) = &cfg.base_url {
                adapter = adapter.with_base_url(url);
            }
            if let Some(limit) = cfg.depth_limit {
                adapter = adapter.with_depth_limit(limit);
            }
            Arc::new(adapter)
        }
        VenueKind::Hyperliquid => {
            let mut adapter = hyperliquid::HyperliquidAdapter::new(client, id, name);
            if let Some(url) = &cfg.base_url {
                adapter = adapter.with_info_url(url);
            }
            Arc::new(adapter)
        }
    }
}

pub mod binance;
pub mod binance_types;
pub mod bybit;
pub mod bybit_types;
pub mod hyperliquid;
pub mod hyperliquid_types;
