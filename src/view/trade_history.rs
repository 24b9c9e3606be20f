//! Trade-history panel.

use super::{Panel, Table};
use crate::domain::trade::TradeHistory;
use crate::shared::{format_amount, format_price};
use crate::store::AppState;
use std::fmt;

pub const TITLE: &str = "Trade History";
pub const NO_TRADES: &str = "No trades yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRow {
    pub id: String,
    pub block: String,
    pub price: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeHistoryPanel {
    /// Newest first.
    pub rows: Vec<TradeRow>,
}

impl TradeHistoryPanel {
    pub fn from_state(state: &AppState) -> Self {
        state.trade_history.with(Self::from_history)
    }

    pub fn from_history(history: &TradeHistory) -> Self {
        Self {
            rows: history
                .records()
                .iter()
                .map(|r| TradeRow {
                    id: r.id.clone(),
                    block: format!("Block #{}", r.timestamp),
                    price: format_price(Some(r.price)),
                    amount: format_amount(Some(r.amount)),
                })
                .collect(),
        }
    }

    pub fn to_panel(&self) -> Panel {
        let mut table = Table::new(["Block", "Price", "Amount"], NO_TRADES);
        for row in &self.rows {
            table.push_row(vec![row.block.clone(), row.price.clone(), row.amount.clone()]);
        }
        Panel::new(TITLE, table.to_string())
    }
}

impl fmt::Display for TradeHistoryPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_panel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::TradeRecord;
    use crate::shared::wad;
    use alloy_primitives::U256;

    #[test]
    fn test_rows_show_block_number() {
        let mut history = TradeHistory::default();
        history.push(TradeRecord {
            id: "a-0".into(),
            order_id_1: 1,
            order_id_2: 2,
            price: U256::from(3) * wad(),
            amount: wad(),
            timestamp: 42,
        });
        let panel = TradeHistoryPanel::from_history(&history);
        assert_eq!(panel.rows[0].block, "Block #42");
        assert_eq!(panel.rows[0].price, "3.000000");
        assert!(panel.to_string().contains("Block #42"));
    }

    #[test]
    fn test_empty_history_placeholder() {
        let panel = TradeHistoryPanel::from_history(&TradeHistory::default());
        assert!(panel.to_string().contains(NO_TRADES));
    }
}
