use std::collections::BTreeMap;

use itertools::Itertools;

use crate::engine::types::{FillResult, Order, PriceStats, PriceSummary, QuoteResult};

/// Volume-weighted price of a set of orders. An empty set prices at zero
/// rather than dividing by zero.
pub fn calc_prices(orders: &[Order]) -> PriceStats {
    calc_prices_iter(orders.iter())
}

fn calc_prices_iter<'a>(orders: impl Iterator<Item = &'a Order>) -> PriceStats {
    let (amount, full_price) = orders.fold((0.0, 0.0), |(amount, full), o| {
        (amount + o.amount, full + o.notional())
    });
    let price = if amount > 0.0 { full_price / amount } else { 0.0 };
    PriceStats { amount, price, full_price }
}

// Same figures, split by the venue each order came from
pub fn compose_prices(orders: &[Order]) -> BTreeMap<String, PriceStats> {
    orders
        .iter()
        .map(|o| (o.source_id.as_str(), o))
        .into_group_map()
        .into_iter()
        .map(|(source, group)| (source.to_string(), calc_prices_iter(group.into_iter())))
        .collect()
}

pub fn price_summary(orders: &[Order]) -> PriceSummary {
    PriceSummary { stats: calc_prices(orders), by_source: compose_prices(orders) }
}

pub fn get_prices(filled: &FillResult) -> QuoteResult {
    QuoteResult { bids: price_summary(&filled.bids), asks: price_summary(&filled.asks) }
}
