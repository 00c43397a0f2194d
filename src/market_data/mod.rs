// Market data module entrypoint
pub mod adapters;       // venue-specific fetchers (Binance, Bybit, Hyperliquid)
pub mod normaliser;     // converts wire strings -> orders
pub mod source;         // timeout + reversed-pair retry + empty-book degrade
pub mod cache;          // TTL memo in front of each source
pub mod aggregator;     // merges every venue into one virtual book
pub mod router;         // orchestrates everything for a quote
