use tracing::{debug, instrument, trace};

use crate::engine::types::{FillResult, Order, OrderBook, Side};

/// Simulate a market order of `amount` against both sides of an aggregated book.
///
/// Each side is walked best-first; the order that completes the target is
/// emitted with only the remainder it contributes. A side that runs dry comes
/// back under-filled, which is a normal outcome.
#[instrument(level = "debug", skip(book), fields(bids = book.bids.len(), asks = book.asks.len()))]
pub fn fill_orders(book: &OrderBook, amount: f64) -> FillResult {
    FillResult {
        bids: fill_side(Side::Bid, &book.bids, amount),
        asks: fill_side(Side::Ask, &book.asks, amount),
    }
}

pub fn fill_side(side: Side, orders: &[Order], amount: f64) -> Vec<Order> {
    if amount.is_nan() || amount <= 0.0 {
        debug!(?side, amount, "Non-positive target, nothing to fill");
        return Vec::new();
    }

    let mut filled_amount = 0.0;
    let mut result = Vec::new();

    for order in orders {
        if filled_amount + order.amount >= amount {
            let remainder = amount - filled_amount;
            trace!(?side, price = order.price, source = %order.source_id, remainder, "Boundary order");
            result.push(Order { amount: remainder, ..order.clone() });
            return result;
        }
        filled_amount += order.amount;
        result.push(order.clone());
    }

    debug!(?side, requested = amount, filled = filled_amount, "Insufficient liquidity - side under-filled");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn total(orders: &[Order]) -> f64 {
        orders.iter().map(|o| o.amount).sum()
    }

    fn book() -> OrderBook {
        OrderBook::new(
            vec![Order::new(100.0, 2.0, "a"), Order::new(99.0, 5.0, "b")],
            vec![Order::new(101.0, 2.0, "a"), Order::new(102.0, 1.0, "b")],
        )
    }

    #[test]
    fn test_partial_fill_truncates_boundary_order() {
        let filled = fill_orders(&book(), 3.0);
        assert_eq!(filled.bids, vec![Order::new(100.0, 2.0, "a"), Order::new(99.0, 1.0, "b")]);
        assert_eq!(filled.asks, vec![Order::new(101.0, 2.0, "a"), Order::new(102.0, 1.0, "b")]);
    }

    #[test]
    fn test_under_fill_consumes_everything() {
        let filled = fill_orders(&book(), 100.0);
        assert_eq!(filled.bids, book().bids);
        assert_eq!(total(&filled.bids), 7.0);
        assert_eq!(total(&filled.asks), 3.0);
    }

    #[test]
    fn test_exact_boundary_stops_walk() {
        // 2.0 exactly exhausts the first bid, so the second is never touched
        let filled = fill_side(Side::Bid, &book().bids, 2.0);
        assert_eq!(filled, vec![Order::new(100.0, 2.0, "a")]);
    }

    #[test]
    fn test_non_positive_amount_fills_nothing() {
        assert!(fill_side(Side::Bid, &book().bids, 0.0).is_empty());
        assert!(fill_side(Side::Ask, &book().asks, -5.0).is_empty());
        assert!(fill_side(Side::Ask, &book().asks, f64::NAN).is_empty());
    }

    #[test]
    fn test_empty_side() {
        let filled = fill_orders(&OrderBook::empty(), 10.0);
        assert!(filled.bids.is_empty());
        assert!(filled.asks.is_empty());
    }

    #[test]
    fn test_fill_keeps_source_attribution() {
        let orders = vec![Order::new(10.0, 1.0, "x").with_name("Venue X")];
        let filled = fill_side(Side::Ask, &orders, 0.5);
        assert_eq!(filled[0].source_name.as_deref(), Some("Venue X"));
        assert_eq!(filled[0].amount, 0.5);
    }

    proptest! {
        #[test]
        fn prop_fill_never_exceeds_target(
            levels in prop::collection::vec((1.0f64..1_000.0, 0.0f64..50.0), 0..40),
            amount in 0.0f64..500.0,
        ) {
            let orders: Vec<Order> = levels.iter().map(|&(p, a)| Order::new(p, a, "s")).collect();
            let available = total(&orders);
            let filled = fill_side(Side::Bid, &orders, amount);
            let got = total(&filled);

            prop_assert!(got <= amount + 1e-9);
            if available >= amount {
                prop_assert!((got - amount).abs() <= 1e-9);
            } else {
                prop_assert!(got < amount);
                prop_assert_eq!(filled.len(), orders.len());
            }
            // only the boundary order may differ from its source
            for (i, o) in filled.iter().enumerate().take(filled.len().saturating_sub(1)) {
                prop_assert_eq!(o, &orders[i]);
            }
        }
    }
}
