// Bybit V5 spot orderbook over REST

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::bybit_types::{BybitOrderbook, BybitResponse};
use super::{SourceError, VenueAdapter};
use crate::engine::types::{OrderBook, Pair};
use crate::market_data::normaliser::Normaliser;

const BYBIT_REST_URL: &str = "https://api.bybit.com";
const DEFAULT_DEPTH_LIMIT: u32 = 200;
// "params error: symbol invalid" / "Invalid symbol"
const UNKNOWN_SYMBOL_CODES: &[i64] = &[10001, 170121];

pub struct BybitAdapter {
    client: reqwest::Client,
    base_url: String,
    depth_limit: u32,
    normaliser: Normaliser,
}

impl BybitAdapter {
    pub fn new(client: reqwest::Client, id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            client,
            base_url: BYBIT_REST_URL.into(),
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

    pub fn parse_orderbook(&self, symbol: &str, status: u16, body: &str) -> Result<OrderBook, SourceError> {
        if !(200..300).contains(&status) {
            return Err(SourceError::Status { status, body: body.to_string() });
        }

        let envelope: BybitResponse = serde_json::from_str(body)?;
        if UNKNOWN_SYMBOL_CODES.contains(&envelope.ret_code) {
            return Err(SourceError::unknown_symbol(symbol));
        }
        if envelope.ret_code != 0 {
            return Err(SourceError::Status {
                status,
                body: format!("retCode {}: {}", envelope.ret_code, envelope.ret_msg),
            });
        }

        let ob: BybitOrderbook = serde_json::from_value(envelope.result)?;
        let bids = self.normaliser.side(ob.b.iter().map(|[p, s]| (p.as_str(), s.as_str())))?;
        let asks = self.normaliser.side(ob.a.iter().map(|[p, s]| (p.as_str(), s.as_str())))?;
        Ok(OrderBook::new(bids, asks))
    }
}

#[async_trait]
impl VenueAdapter for BybitAdapter {
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
            .get(format!("{}/v5/market/orderbook", self.base_url))
            .query(&[("category", "spot"), ("symbol", symbol.as_str()), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;
        debug!(status, bytes = body.len(), "Orderbook response");
        self.parse_orderbook(&symbol, status, &body)
    }
}
