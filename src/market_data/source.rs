use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use crate::engine::types::{OrderBook, Pair};
use crate::market_data::adapters::{SourceError, VenueAdapter};

/// A venue wrapped in the policy every venue shares: bounded latency, one
/// retry with the pair reversed when the symbol is unknown, and an empty book
/// instead of an error when nothing works.
///
/// The reversed retry swaps the query only. Sides and prices of whatever comes
/// back are used as-is, so a venue that only lists QUOTE/BASE contributes a
/// book in QUOTE/BASE terms.
#[derive(Clone)]
pub struct ExchangeSource {
    adapter: Arc<dyn VenueAdapter>,
    timeout: Duration,
}

impl ExchangeSource {
    pub fn new(adapter: Arc<dyn VenueAdapter>, timeout: Duration) -> Self {
        Self { adapter, timeout }
    }

    pub fn id(&self) -> &str {
        self.adapter.id()
    }

    pub fn name(&self) -> Option<&str> {
        self.adapter.name()
    }

    #[instrument(level = "debug", skip(self), fields(source = %self.id(), pair = %pair))]
    pub async fn fetch(&self, pair: &Pair) -> OrderBook {
        let err = match self.try_fetch(pair).await {
            Ok(book) => return book,
            Err(e) => e,
        };

        if !err.is_unknown_symbol() {
            return self.degrade(pair, err);
        }

        let reversed = pair.reversed();
        debug!(reversed = %reversed, "Symbol unknown, retrying with reversed pair");
        match self.try_fetch(&reversed).await {
            Ok(book) => book,
            Err(e) => self.degrade(&reversed, e),
        }
    }

    async fn try_fetch(&self, pair: &Pair) -> Result<OrderBook, SourceError> {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.adapter.fetch_book(pair)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.timeout)),
        };
        metrics::histogram!("depthx_fetch_seconds", "source" => self.id().to_string())
            .record(start.elapsed().as_secs_f64());
        result
    }

    fn degrade(&self, pair: &Pair, err: SourceError) -> OrderBook {
        warn!(source = %self.id(), pair = %pair, error = %err, "Fetch failed, contributing an empty book");
        metrics::counter!("depthx_source_degraded_total", "source" => self.id().to_string()).increment(1);
        OrderBook::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Order;
    use parking_lot::Mutex;

    // Lists exactly one symbol; records every pair it was asked for
    struct OneSymbolVenue {
        listed: Pair,
        calls: Mutex<Vec<Pair>>,
    }

    impl OneSymbolVenue {
        fn new(listed: Pair) -> Self {
            Self { listed, calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait::async_trait]
    impl VenueAdapter for OneSymbolVenue {
        fn id(&self) -> &str {
            "one"
        }

        async fn fetch_book(&self, pair: &Pair) -> Result<OrderBook, SourceError> {
            self.calls.lock().push(pair.clone());
            if *pair == self.listed {
                Ok(OrderBook::new(vec![Order::new(0.5, 1.0, "one")], vec![Order::new(0.6, 1.0, "one")]))
            } else {
                Err(SourceError::unknown_symbol(pair.concat()))
            }
        }
    }

    struct BrokenVenue;

    #[async_trait::async_trait]
    impl VenueAdapter for BrokenVenue {
        fn id(&self) -> &str {
            "broken"
        }

        async fn fetch_book(&self, _pair: &Pair) -> Result<OrderBook, SourceError> {
            Err(SourceError::Status { status: 503, body: "maintenance".into() })
        }
    }

    struct SlowVenue;

    #[async_trait::async_trait]
    impl VenueAdapter for SlowVenue {
        fn id(&self) -> &str {
            "slow"
        }

        async fn fetch_book(&self, _pair: &Pair) -> Result<OrderBook, SourceError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(OrderBook::new(vec![Order::new(1.0, 1.0, "slow")], vec![]))
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_direct_hit_makes_one_call() {
        let venue = Arc::new(OneSymbolVenue::new(Pair::new("BTC", "USDT")));
        let source = ExchangeSource::new(venue.clone(), TIMEOUT);
        let book = source.fetch(&Pair::new("BTC", "USDT")).await;
        assert_eq!(book.bids.len(), 1);
        assert_eq!(venue.calls.lock().len(), 1);
    }

    // Known-risky path: the reversed book is returned without inverting sides or prices
    #[tokio::test]
    async fn test_reversed_retry_keeps_sides_as_reported() {
        let venue = Arc::new(OneSymbolVenue::new(Pair::new("USDT", "BTC")));
        let source = ExchangeSource::new(venue.clone(), TIMEOUT);

        let book = source.fetch(&Pair::new("BTC", "USDT")).await;
        assert_eq!(*venue.calls.lock(), vec![Pair::new("BTC", "USDT"), Pair::new("USDT", "BTC")]);
        assert_eq!(book.bids[0].price, 0.5);
        assert_eq!(book.asks[0].price, 0.6);
    }

    #[tokio::test]
    async fn test_retries_exactly_once() {
        let venue = Arc::new(OneSymbolVenue::new(Pair::new("ETH", "USDC")));
        let source = ExchangeSource::new(venue.clone(), TIMEOUT);
        let book = source.fetch(&Pair::new("BTC", "USDT")).await;
        assert!(book.is_empty());
        assert_eq!(venue.calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_other_failures_degrade_without_retry() {
        let source = ExchangeSource::new(Arc::new(BrokenVenue), TIMEOUT);
        assert_eq!(source.fetch(&Pair::new("BTC", "USDT")).await, OrderBook::empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades() {
        let source = ExchangeSource::new(Arc::new(SlowVenue), TIMEOUT);
        assert!(source.fetch(&Pair::new("BTC", "USDT")).await.is_empty());
    }
}
