use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use ordered_float::OrderedFloat;
use tracing::{debug, instrument};

use crate::engine::types::{OrderBook, Pair};
use crate::market_data::cache::{Cached, TtlCache};
use crate::market_data::source::ExchangeSource;

/// An `ExchangeSource` behind its own TTL cache, keyed by the exact pair.
pub struct CachedSource {
    source: ExchangeSource,
    cache: TtlCache<Pair, Arc<OrderBook>>,
}

impl CachedSource {
    pub fn new(source: ExchangeSource, ttl: Duration, max_entries: usize) -> Self {
        Self { source, cache: TtlCache::new(ttl, max_entries) }
    }

    pub fn id(&self) -> &str {
        self.source.id()
    }

    pub fn cache(&self) -> &TtlCache<Pair, Arc<OrderBook>> {
        &self.cache
    }

    pub async fn get(&self, pair: &Pair) -> Cached<Arc<OrderBook>> {
        let result = self
            .cache
            .get_with(pair, || async { Arc::new(self.source.fetch(pair).await) })
            .await;

        let source = self.id().to_string();
        if result.cached {
            metrics::counter!("depthx_cache_hits_total", "source" => source).increment(1);
        } else {
            metrics::counter!("depthx_cache_misses_total", "source" => source).increment(1);
        }
        result
    }
}

/// Builds one virtual book out of every configured venue.
pub struct Aggregator {
    sources: Vec<CachedSource>,
}

impl Aggregator {
    pub fn new(sources: Vec<CachedSource>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[CachedSource] {
        &self.sources
    }

    pub fn source_ids(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    // Venues are queried concurrently; join_all keeps them in configured order
    #[instrument(level = "debug", skip(self), fields(pair = %pair, sources = self.sources.len()))]
    pub async fn get_orders(&self, pair: &Pair) -> OrderBook {
        let books = join_all(self.sources.iter().map(|s| s.get(pair))).await;

        for (source, book) in self.sources.iter().zip(&books) {
            debug!(
                source = %source.id(),
                cached = book.cached,
                bids = book.value.bids.len(),
                asks = book.value.asks.len(),
                "Source book"
            );
        }

        merge_books(books.iter().map(|b| b.value.as_ref()))
    }
}

/// Concatenate per-venue books and sort each side best-first. The sort is
/// stable, so equal prices keep venue order.
pub fn merge_books<'a, I>(books: I) -> OrderBook
where
    I: IntoIterator<Item = &'a OrderBook>,
{
    let mut merged = OrderBook::empty();
    for book in books {
        merged.bids.extend(book.bids.iter().cloned());
        merged.asks.extend(book.asks.iter().cloned());
    }
    merged.bids.sort_by_key(|o| Reverse(OrderedFloat(o.price)));
    merged.asks.sort_by_key(|o| OrderedFloat(o.price));
    merged
}
