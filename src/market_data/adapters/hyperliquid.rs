// Hyperliquid L2 snapshot via the /info endpoint

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::hyperliquid_types::{InfoRequest, L2Book, WsLevel};
use super::{SourceError, VenueAdapter};
use crate::engine::types::{Order, OrderBook, Pair};
use crate::market_data::normaliser::Normaliser;

const HYPERLIQUID_INFO_URL: &str = "https://api.hyperliquid.xyz/info";
// Books are keyed by coin and always quoted in USD(C)
const SUPPORTED_QUOTES: &[&str] = &["USD", "USDC"];

pub struct HyperliquidAdapter {
    client: reqwest::Client,
    info_url: String,
    normaliser: Normaliser,
}

impl HyperliquidAdapter {
    pub fn new(client: reqwest::Client, id: impl Into<String>, name: Option<String>) -> Self {
        Self { client, info_url: HYPERLIQUID_INFO_URL.into(), normaliser: Normaliser::new(id, name) }
    }

    pub fn with_info_url(mut self, url: &str) -> Self {
        self.info_url = url.to_string();
        self
    }

    // Pick the coin for `pair`, or refuse without touching the network
    pub fn coin_for(pair: &Pair) -> Result<&str, SourceError> {
        if SUPPORTED_QUOTES.iter().any(|q| q.eq_ignore_ascii_case(&pair.quote)) {
            Ok(&pair.base)
        } else {
            Err(SourceError::unknown_symbol(pair.to_string()))
        }
    }

    pub fn parse_l2book(&self, coin: &str, status: u16, body: &str) -> Result<OrderBook, SourceError> {
        if !(200..300).contains(&status) {
            return Err(SourceError::Status { status, body: body.to_string() });
        }
        // unknown coins come back as a literal `null`
        let book: Option<L2Book> = serde_json::from_str(body)?;
        let book = book.ok_or_else(|| SourceError::unknown_symbol(coin))?;

        let (bids, asks) = &book.levels;
        Ok(OrderBook::new(self.norm_side(bids)?, self.norm_side(asks)?))
    }

    fn norm_side(&self, side: &[WsLevel]) -> Result<Vec<Order>, SourceError> {
        self.normaliser.side(side.iter().map(|lvl| (lvl.px.as_str(), lvl.sz.as_str())))
    }
}

#[async_trait]
impl VenueAdapter for HyperliquidAdapter {
    fn id(&self) -> &str {
        &self.normaliser.source_id
    }

    fn name(&self) -> Option<&str> {
        self.normaliser.source_name.as_deref()
    }

    #[instrument(level = "debug", skip(self), fields(source = %self.id(), pair = %pair))]
    async fn fetch_book(&self, pair: &Pair) -> Result<OrderBook, SourceError> {
        let coin = Self::coin_for(pair)?;
        let res = self
            .client
            .post(&self.info_url)
            .json(&InfoRequest { kind: "l2Book", coin })
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;
        debug!(status, bytes = body.len(), "l2Book response");
        self.parse_l2book(coin, status, &body)
    }
}
