// Binance spot depth over REST

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::binance_types::{ApiError, DepthResponse};
use super::{SourceError, VenueAdapter};
use crate::engine::types::{OrderBook, Pair};
use crate::market_data::normaliser::Normaliser;

const BINANCE_REST_URL: &str = "https://api.binance.com";
const DEFAULT_DEPTH_LIMIT: u32 = 1000;
const INVALID_SYMBOL: i64 = -1121;

pub struct BinanceAdapter {
    client: reqwest::Client,
    base_url: String,
    depth_limit: u32,
    normaliser: Normaliser,
}

impl BinanceAdapter {
    pub fn new(client: reqwest::Client, id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            client,
            base_url: BINANCE_REST_URL.into(),
            depth_limit: DEFAULT_DEPTH_LIMIT,
            normaliser: Normaliser::new(id, name),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_depth_limit(mut self, limit: u32) -> Self {
        self.depth_limit = limit;
        self
    }

    // Split out from the HTTP call so payloads can be checked without a network
    pub fn parse_depth(&self, symbol: &str, status: u16, body: &str) -> Result<OrderBook, SourceError> {
        if !(200..300).contains(&status) {
            if let Ok(err) = serde_json::from_str::<ApiError>(body) {
                if err.code == INVALID_SYMBOL {
                    return Err(SourceError::unknown_symbol(symbol));
                }
            }
            return Err(SourceError::Status { status, body: body.to_string() });
        }

        let depth: DepthResponse = serde_json::from_str(body)?;
        let bids = self.normaliser.side(depth.bids.iter().map(|[p, s]| (p.as_str(), s.as_str())))?;
        let asks = self.normaliser.side(depth.asks.iter().map(|[p, s]| (p.as_str(), s.as_str())))?;
        Ok(OrderBook::new(bids, asks))
    }
}

#[async_trait]
impl VenueAdapter for BinanceAdapter {
    fn id(&self) -> &str {
        &self.normaliser.source_id
    }

    fn name(&self) -> Option<&str> {
        self.normaliser.source_name.as_deref()
    }

    #[instrument(level = "debug", skip(self), fields(source = %self.id(), pair = %pair))]
    async fn fetch_book(&self, pair: &Pair) -> Result<OrderBook, SourceError> {
        let symbol = pair.concat();
        let limit = self.depth_limit.to_string();
        let res = self
            .client
            .get(format!("{}/api/v3/depth", self.base_url))
            .query(&[("symbol", symbol.as_str()), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;
        debug!(status, bytes = body.len(), "Depth response");
        self.parse_depth(&symbol, status, &body)
    }
}
