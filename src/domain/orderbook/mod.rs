//! Orderbook domain — per-price aggregation of the contract's raw order rows.
//!
//! The contract returns one row per resting order. For display, rows at the
//! same exact price are merged into a [`MergedPriceLevel`]; asks are sorted
//! best (lowest) first and bids best (highest) first.
//!
//! Aggregation is a pure, full recomputation from one snapshot. There is no
//! incremental update path: every refresh re-reads the whole book.

pub mod refresh;
pub mod state;

pub use refresh::OrderBookRefresher;
pub use state::OrderBookFeed;

use crate::domain::order::wire::{OrderBookRows, OrderRow};
use crate::domain::order::Order;
use crate::shared::serde_util::u256_dec;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// All resting orders at one exact price.
///
/// Invariant: every order in `orders` has `price`, and `total_amount` is the
/// exact sum of their amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedPriceLevel {
    #[serde(with = "u256_dec")]
    pub price: U256,
    #[serde(with = "u256_dec")]
    pub total_amount: U256,
    pub orders: Vec<Order>,
}

impl MergedPriceLevel {
    fn open(order: Order) -> Self {
        Self {
            price: order.price,
            total_amount: order.amount,
            orders: vec![order],
        }
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

/// Both sides of the book after aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedOrderBook {
    asks: Vec<MergedPriceLevel>,
    bids: Vec<MergedPriceLevel>,
}

impl MergedOrderBook {
    /// Asks sorted by price ascending (best ask first).
    pub fn asks(&self) -> &[MergedPriceLevel] {
        &self.asks
    }

    /// Bids sorted by price descending (best bid first).
    pub fn bids(&self) -> &[MergedPriceLevel] {
        &self.bids
    }

    /// Lowest ask price.
    pub fn best_ask(&self) -> Option<U256> {
        self.asks.first().map(|l| l.price)
    }

    /// Highest bid price.
    pub fn best_bid(&self) -> Option<U256> {
        self.bids.first().map(|l| l.price)
    }

    /// Average of best ask and best bid (integer division). Falls back to
    /// whichever side exists; `None` for an empty book.
    pub fn mid_price(&self) -> Option<U256> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(midpoint(ask, bid)),
            (Some(ask), None) => Some(ask),
            (None, Some(bid)) => Some(bid),
            (None, None) => None,
        }
    }

    /// Best ask minus best bid, when both exist and the book is not crossed.
    pub fn spread(&self) -> Option<U256> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => ask.checked_sub(bid),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }
}

/// Merge a raw `(bids, asks)` snapshot into sorted price levels.
///
/// Rows with a zero price, rows that fail conversion, and rows whose amount
/// would overflow their level's total are skipped individually.
pub fn aggregate(rows: OrderBookRows) -> MergedOrderBook {
    let asks = merge_side(rows.asks, "ask");
    let bids = merge_side(rows.bids, "bid");

    MergedOrderBook {
        asks: asks.into_values().collect(),
        bids: bids.into_values().rev().collect(),
    }
}

fn merge_side(rows: Vec<OrderRow>, side: &'static str) -> BTreeMap<U256, MergedPriceLevel> {
    let mut levels: BTreeMap<U256, MergedPriceLevel> = BTreeMap::new();

    for row in rows {
        if row.price.is_zero() {
            tracing::debug!(side, order_id = %row.order_id, "Skipping zero-price order row");
            continue;
        }

        let order = match Order::try_from(row) {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(side, "Skipping malformed order row: {}", e);
                continue;
            }
        };

        match levels.entry(order.price) {
            Entry::Vacant(slot) => {
                slot.insert(MergedPriceLevel::open(order));
            }
            Entry::Occupied(mut slot) => {
                let level = slot.get_mut();
                match level.total_amount.checked_add(order.amount) {
                    Some(total) => {
                        level.total_amount = total;
                        level.orders.push(order);
                    }
                    None => {
                        tracing::warn!(
                            side,
                            order_id = order.order_id,
                            "Skipping order row: level total at {} overflows",
                            level.price
                        );
                    }
                }
            }
        }
    }

    levels
}

fn midpoint(a: U256, b: U256) -> U256 {
    // (a + b) / 2 without overflowing on the sum.
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    lo + (hi - lo) / U256::from(2u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use proptest::prelude::*;

    fn row(order_id: u64, price: u64, amount: u64, is_bid: bool) -> OrderRow {
        OrderRow {
            order_id: U256::from(order_id),
            owner: Address::repeat_byte(order_id as u8),
            price: U256::from(price),
            amount: U256::from(amount),
            is_bid,
        }
    }

    fn bids(rows: &[(u64, u64)]) -> OrderBookRows {
        OrderBookRows {
            bids: rows
                .iter()
                .enumerate()
                .map(|(i, (p, a))| row(i as u64 + 1, *p, *a, true))
                .collect(),
            asks: vec![],
        }
    }

    #[test]
    fn test_bid_scenario_merges_and_sorts_descending() {
        let book = aggregate(bids(&[(100, 5), (100, 3), (90, 1)]));
        let levels = book.bids();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].price, U256::from(100));
        assert_eq!(levels[0].total_amount, U256::from(8));
        assert_eq!(levels[0].order_count(), 2);
        assert_eq!(levels[1].price, U256::from(90));
        assert_eq!(levels[1].total_amount, U256::from(1));
        assert_eq!(levels[1].order_count(), 1);
    }

    #[test]
    fn test_level_keeps_input_order() {
        let book = aggregate(bids(&[(100, 5), (90, 1), (100, 3)]));
        let ids: Vec<u64> = book.bids()[0].orders.iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_asks_sort_ascending() {
        let rows = OrderBookRows {
            bids: vec![],
            asks: vec![row(1, 120, 1, false), row(2, 110, 2, false), row(3, 130, 3, false)],
        };
        let book = aggregate(rows);
        let prices: Vec<U256> = book.asks().iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![U256::from(110), U256::from(120), U256::from(130)]);
        assert_eq!(book.best_ask(), Some(U256::from(110)));
    }

    #[test]
    fn test_zero_price_rows_are_skipped() {
        let book = aggregate(bids(&[(0, 5), (100, 3)]));
        assert_eq!(book.bids().len(), 1);
        assert_eq!(book.bids()[0].total_amount, U256::from(3));
    }

    #[test]
    fn test_malformed_row_is_skipped_individually() {
        let mut rows = bids(&[(100, 5), (100, 3)]);
        rows.bids[0].order_id = U256::MAX;
        let book = aggregate(rows);
        assert_eq!(book.bids().len(), 1);
        assert_eq!(book.bids()[0].total_amount, U256::from(3));
        assert_eq!(book.bids()[0].order_count(), 1);
    }

    #[test]
    fn test_total_overflow_skips_row() {
        let mut rows = bids(&[(100, 1), (100, 1)]);
        rows.bids[0].amount = U256::MAX;
        let book = aggregate(rows);
        assert_eq!(book.bids()[0].total_amount, U256::MAX);
        assert_eq!(book.bids()[0].order_count(), 1);
    }

    #[test]
    fn test_prices_beyond_u128_stay_exact() {
        let big = U256::from(u128::MAX) * U256::from(4u8);
        let mut rows = bids(&[(1, 2), (1, 3)]);
        rows.bids[0].price = big;
        rows.bids[1].price = big + U256::from(1u8);
        let book = aggregate(rows);
        assert_eq!(book.bids().len(), 2);
        assert_eq!(book.best_bid(), Some(big + U256::from(1u8)));
    }

    #[test]
    fn test_mid_price_and_spread() {
        let rows = OrderBookRows {
            bids: vec![row(1, 100, 1, true)],
            asks: vec![row(2, 105, 1, false)],
        };
        let book = aggregate(rows);
        assert_eq!(book.mid_price(), Some(U256::from(102)));
        assert_eq!(book.spread(), Some(U256::from(5)));
    }

    #[test]
    fn test_mid_price_single_side_and_empty() {
        let book = aggregate(bids(&[(90, 1)]));
        assert_eq!(book.mid_price(), Some(U256::from(90)));
        assert_eq!(book.spread(), None);

        let empty = aggregate(OrderBookRows::default());
        assert!(empty.is_empty());
        assert_eq!(empty.mid_price(), None);
    }

    #[test]
    fn test_midpoint_does_not_overflow() {
        assert_eq!(midpoint(U256::MAX, U256::MAX), U256::MAX);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<(u64, u64)>> {
        prop::collection::vec((0u64..8, 0u64..1_000), 0..40)
    }

    proptest! {
        #[test]
        fn prop_levels_sum_and_membership(rows in arb_rows()) {
            let book = aggregate(bids(&rows));
            for level in book.bids() {
                let expected: Vec<u64> = rows
                    .iter()
                    .filter(|(p, _)| U256::from(*p) == level.price)
                    .map(|(_, a)| *a)
                    .collect();
                let sum: u64 = expected.iter().sum();
                prop_assert_eq!(level.total_amount, U256::from(sum));
                prop_assert_eq!(level.orders.len(), expected.len());
                prop_assert!(level.orders.iter().all(|o| o.price == level.price));
            }
            let distinct_nonzero: std::collections::BTreeSet<u64> =
                rows.iter().map(|(p, _)| *p).filter(|p| *p != 0).collect();
            prop_assert_eq!(book.bids().len(), distinct_nonzero.len());
        }

        #[test]
        fn prop_zero_price_never_appears(rows in arb_rows()) {
            let book = aggregate(bids(&rows));
            prop_assert!(book.bids().iter().all(|l| !l.price.is_zero()));
        }

        #[test]
        fn prop_sorted_for_any_permutation(
            (original, shuffled) in arb_rows()
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            let as_asks = |v: &[(u64, u64)]| OrderBookRows {
                bids: v.iter().enumerate().map(|(i, (p, a))| row(i as u64, *p, *a, true)).collect(),
                asks: v.iter().enumerate().map(|(i, (p, a))| row(i as u64, *p, *a, false)).collect(),
            };
            let a = aggregate(as_asks(&original));
            let b = aggregate(as_asks(&shuffled));

            prop_assert!(a.asks().windows(2).all(|w| w[0].price <= w[1].price));
            prop_assert!(a.bids().windows(2).all(|w| w[0].price >= w[1].price));

            let summary = |levels: &[MergedPriceLevel]| -> Vec<(U256, U256, usize)> {
                levels.iter().map(|l| (l.price, l.total_amount, l.orders.len())).collect()
            };
            prop_assert_eq!(summary(a.asks()), summary(b.asks()));
            prop_assert_eq!(summary(a.bids()), summary(b.bids()));
        }
    }
}
