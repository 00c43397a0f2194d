use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

/// Ordered (base, quote) market identifier. `(BTC, USDT)` and `(USDT, BTC)` are
/// different keys; nothing here normalizes case or order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub base: String,
    pub quote: String,
}

impl Pair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self { base: base.into(), quote: quote.into() }
    }

    pub fn reversed(&self) -> Self {
        Self { base: self.quote.clone(), quote: self.base.clone() }
    }

    // Venue symbol with no separator, e.g. "BTCUSDT"
    pub fn concat(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PairParseError {
    #[error("pair `{0}` must look like BASE:QUOTE")]
    MissingSeparator(String),
    #[error("pair `{0}` has an empty side")]
    EmptySide(String),
}

// Parses the `BASE:QUOTE` form used on the HTTP path and the CLI.
impl FromStr for Pair {
    type Err = PairParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once(':')
            .ok_or_else(|| PairParseError::MissingSeparator(s.to_string()))?;
        if base.is_empty() || quote.is_empty() {
            return Err(PairParseError::EmptySide(s.to_string()));
        }
        Ok(Pair::new(base, quote))
    }
}

// Standing order as reported by one venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub price: f64,
    pub amount: f64,
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

impl Order {
    pub fn new(price: f64, amount: f64, source_id: impl Into<String>) -> Self {
        Self { price, amount, source_id: source_id.into(), source_name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn notional(&self) -> f64 {
        self.price * self.amount
    }
}

/// Both sides of a book. A single venue's raw output is unordered; after
/// aggregation bids are best-first (descending) and asks best-first (ascending).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
}

impl OrderBook {
    pub fn new(bids: Vec<Order>, asks: Vec<Order>) -> Self {
        Self { bids, asks }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

// Orders consumed on each side by a simulated market order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FillResult {
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub amount: f64,
    pub price: f64,
    pub full_price: f64,
}

/// Volume-weighted summary of one filled side, with the same figures split by
/// the venue that supplied each order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    #[serde(flatten)]
    pub stats: PriceStats,
    pub by_source: BTreeMap<String, PriceStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub bids: PriceSummary,
    pub asks: PriceSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_parse() {
        let pair: Pair = "BTC:USDT".parse().unwrap();
        assert_eq!(pair, Pair::new("BTC", "USDT"));
        assert_eq!(pair.concat(), "BTCUSDT");
        assert_eq!(pair.to_string(), "BTC/USDT");
    }

    #[test]
    fn test_pair_parse_rejects_malformed() {
        assert_eq!(
            "BTCUSDT".parse::<Pair>(),
            Err(PairParseError::MissingSeparator("BTCUSDT".into()))
        );
        assert_eq!(":USDT".parse::<Pair>(), Err(PairParseError::EmptySide(":USDT".into())));
        assert_eq!("BTC:".parse::<Pair>(), Err(PairParseError::EmptySide("BTC:".into())));
    }

    #[test]
    fn test_pair_order_matters() {
        let pair = Pair::new("BTC", "USDT");
        assert_ne!(pair, pair.reversed());
        assert_eq!(pair, pair.reversed().reversed());
    }

    #[test]
    fn test_summary_serializes_flat() {
        let mut summary = PriceSummary {
            stats: PriceStats { amount: 2.0, price: 100.0, full_price: 200.0 },
            by_source: BTreeMap::new(),
        };
        summary.by_source.insert("a".into(), summary.stats);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["amount"], 2.0);
        assert_eq!(json["full_price"], 200.0);
        assert_eq!(json["by_source"]["a"]["price"], 100.0);
        assert!(json["by_source"]["a"].get("by_source").is_none());
    }
}
