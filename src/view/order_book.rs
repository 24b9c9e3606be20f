//! Order-book panel: asks above the mid price, bids below.

use super::{Panel, Table};
use crate::domain::orderbook::{MergedOrderBook, MergedPriceLevel};
use crate::shared::{format_amount, format_price};
use crate::store::AppState;
use alloy_primitives::U256;
use std::fmt;

pub const TITLE: &str = "Order Book";
pub const LOADING_ORDER_BOOK: &str = "Loading order book...";
pub const WAITING_FOR_MARKET: &str = "Waiting for market";
pub const NO_ASKS: &str = "No sell orders";
pub const NO_BIDS: &str = "No buy orders";
pub const REFRESH: &str = "[Refresh]";

const HEADERS: [&str; 3] = ["Price", "Amount", "Orders"];

/// One clickable price level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRow {
    pub price: U256,
    pub is_ask: bool,
    pub price_text: String,
    pub amount_text: String,
    pub order_count: usize,
}

impl LevelRow {
    fn new(level: &MergedPriceLevel, is_ask: bool) -> Self {
        Self {
            price: level.price,
            is_ask,
            price_text: format_price(Some(level.price)),
            amount_text: format_amount(Some(level.total_amount)),
            order_count: level.order_count(),
        }
    }

    /// Row clicked: select its price and the matching trade side.
    pub fn select(&self, state: &AppState) {
        state.select_level(self.price, self.is_ask);
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.price_text.clone(),
            self.amount_text.clone(),
            self.order_count.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBookPanel {
    /// Placeholder shown instead of the tables.
    pub loading: bool,
    /// Highest price first, so the best ask sits next to the mid price.
    pub asks: Vec<LevelRow>,
    pub mid_price: String,
    /// Best (highest) bid first.
    pub bids: Vec<LevelRow>,
}

impl OrderBookPanel {
    pub fn from_state(state: &AppState) -> Self {
        let loading = state.order_book_loading.get();
        state.order_book.with(|book| Self::from_book(book, loading))
    }

    /// The loading placeholder is only shown until a first book is available.
    pub fn from_book(book: &MergedOrderBook, loading: bool) -> Self {
        Self {
            loading: loading && book.is_empty(),
            asks: book.asks().iter().rev().map(|l| LevelRow::new(l, true)).collect(),
            mid_price: book
                .mid_price()
                .map(|p| format_price(Some(p)))
                .unwrap_or_else(|| WAITING_FOR_MARKET.to_string()),
            bids: book.bids().iter().map(|l| LevelRow::new(l, false)).collect(),
        }
    }

    pub fn to_panel(&self) -> Panel {
        if self.loading {
            return Panel::new(TITLE, LOADING_ORDER_BOOK);
        }

        let mut asks = Table::new(HEADERS, NO_ASKS);
        self.asks.iter().for_each(|r| asks.push_row(r.cells()));
        let mut bids = Table::new(HEADERS, NO_BIDS);
        self.bids.iter().for_each(|r| bids.push_row(r.cells()));

        Panel::new(
            TITLE,
            format!("{}\n{}--- {} ---\n{}", REFRESH, asks, self.mid_price, bids),
        )
    }
}

impl fmt::Display for OrderBookPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_panel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::wire::{OrderBookRows, OrderRow};
    use crate::domain::orderbook::aggregate;
    use crate::shared::{wad, TradeSide};
    use alloy_primitives::Address;

    fn row(id: u64, price: u64, is_bid: bool) -> OrderRow {
        OrderRow {
            order_id: U256::from(id),
            owner: Address::ZERO,
            price: U256::from(price) * wad(),
            amount: wad(),
            is_bid,
        }
    }

    fn book() -> MergedOrderBook {
        aggregate(OrderBookRows {
            bids: vec![row(1, 99, true), row(2, 98, true)],
            asks: vec![row(3, 101, false), row(4, 102, false)],
        })
    }

    #[test]
    fn test_asks_render_highest_first() {
        let panel = OrderBookPanel::from_book(&book(), false);
        let asks: Vec<&str> = panel.asks.iter().map(|r| r.price_text.as_str()).collect();
        assert_eq!(asks, ["102.000000", "101.000000"]);
        assert_eq!(panel.bids[0].price_text, "99.000000");
        assert_eq!(panel.mid_price, "100.000000");
    }

    #[test]
    fn test_empty_book_placeholders() {
        let panel = OrderBookPanel::from_book(&MergedOrderBook::default(), false);
        let text = panel.to_string();
        assert!(text.contains(NO_ASKS));
        assert!(text.contains(NO_BIDS));
        assert!(text.contains(WAITING_FOR_MARKET));
    }

    #[test]
    fn test_loading_placeholder_only_without_data() {
        let empty = OrderBookPanel::from_book(&MergedOrderBook::default(), true);
        assert!(empty.to_string().contains(LOADING_ORDER_BOOK));
        let loaded = OrderBookPanel::from_book(&book(), true);
        assert!(!loaded.loading);
    }

    #[test]
    fn test_clicking_ask_selects_sell() {
        let state = AppState::new();
        let panel = OrderBookPanel::from_book(&book(), false);
        panel.asks[1].select(&state);
        assert_eq!(state.selected_price.get(), "101.000000");
        assert_eq!(state.trade_side.get(), TradeSide::Sell);
    }
}
