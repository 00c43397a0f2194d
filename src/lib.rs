//! depthx: blended execution price for a market order across several venues.
//!
//! Each venue's depth is fetched (through a per-venue TTL cache), merged into
//! one virtual book, consumed by a simulated market order, and reduced to a
//! volume-weighted price with a per-venue breakdown.

pub mod api;
pub mod config;
pub mod engine;
pub mod market_data;
pub mod telemetry;

pub use engine::types::{Order, OrderBook, Pair, PriceStats, PriceSummary, QuoteResult};
pub use market_data::router::QuoteRouter;
