// Router orchestrates venues -> merged book -> fill -> prices
use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::engine::fill::fill_orders;
use crate::engine::pricing::get_prices;
use crate::engine::types::{Pair, QuoteResult};
use crate::market_data::adapters;
use crate::market_data::aggregator::{Aggregator, CachedSource};
use crate::market_data::source::ExchangeSource;

/// The one query the service answers. Built once at startup and shared by
/// every request; the only mutable state inside is each venue's cache.
pub struct QuoteRouter {
    aggregator: Aggregator,
}

impl QuoteRouter {
    pub fn new(aggregator: Aggregator) -> Self {
        Self { aggregator }
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.fetch.timeout())
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        let sources = cfg
            .venues
            .iter()
            .map(|venue| {
                let adapter = adapters::build(venue, client.clone());
                let source = CachedSource::new(
                    ExchangeSource::new(adapter, cfg.fetch.timeout()),
                    venue.ttl(&cfg.cache),
                    venue.max_entries(&cfg.cache),
                );
                info!(
                    source = %source.id(),
                    ttl_secs = source.cache().ttl().as_secs(),
                    max_entries = source.cache().max_entries(),
                    "Venue enabled"
                );
                source
            })
            .collect();

        Ok(Self::new(Aggregator::new(sources)))
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Price a hypothetical market order of `amount` on both sides. Never
    /// fails: missing liquidity shows up as zero or under-filled summaries.
    #[instrument(skip(self), fields(pair = %pair))]
    pub async fn get_quote(&self, pair: &Pair, amount: f64) -> QuoteResult {
        let merged = self.aggregator.get_orders(pair).await;
        let filled = fill_orders(&merged, amount);
        let quote = get_prices(&filled);
        info!(
            bid_amount = quote.bids.stats.amount,
            bid_price = quote.bids.stats.price,
            ask_amount = quote.asks.stats.amount,
            ask_price = quote.asks.stats.price,
            "Quote computed"
        );
        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VenueConfig;
    use crate::market_data::adapters::VenueKind;

    #[test]
    fn test_from_config_keeps_venue_order() {
        let mut cfg = AppConfig::load(None).unwrap();
        cfg.venues = vec![VenueConfig::of(VenueKind::Hyperliquid), VenueConfig::of(VenueKind::Binance)];
        let router = QuoteRouter::from_config(&cfg).unwrap();
        assert_eq!(router.aggregator().source_ids(), vec!["hyperliquid", "binance"]);
    }

    #[test]
    fn test_from_config_applies_venue_cache_overrides() {
        let mut cfg = AppConfig::load(None).unwrap();
        let mut bybit = VenueConfig::of(VenueKind::Bybit);
        bybit.ttl_secs = Some(5);
        bybit.max_entries = Some(3);
        cfg.venues = vec![VenueConfig::of(VenueKind::Binance), bybit];

        let router = QuoteRouter::from_config(&cfg).unwrap();
        let sources = router.aggregator().sources();
        assert_eq!(sources[0].cache().ttl().as_secs(), cfg.cache.ttl_secs);
        assert_eq!(sources[0].cache().max_entries(), cfg.cache.max_entries);
        assert_eq!(sources[1].cache().ttl().as_secs(), 5);
        assert_eq!(sources[1].cache().max_entries(), 3);
    }

    #[tokio::test]
    async fn test_no_venues_quotes_zero() {
        let router = QuoteRouter::new(Aggregator::new(Vec::new()));
        let quote = router.get_quote(&Pair::new("BTC", "USDT"), 1.0).await;
        assert_eq!(quote, QuoteResult::default());
    }
}
