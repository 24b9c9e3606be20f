//! The trading page: order book, trade history, and balances + order entry.

use super::{BalancePanel, OrderBookPanel, TradeFormPanel, TradeHistoryPanel};
use crate::domain::form::OrderForm;
use crate::domain::token::MintAction;
use crate::shared::truncate_address;
use crate::store::{AppState, Notification, NotificationLevel};
use std::fmt;
use std::sync::Arc;

pub const NOT_CONNECTED: &str = "Not connected";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub account: String,
    pub order_book: OrderBookPanel,
    pub trade_history: TradeHistoryPanel,
    pub balances: BalancePanel,
    pub trade_form: TradeFormPanel,
    pub notifications: Vec<Notification>,
}

impl Page {
    pub fn build(state: &AppState, form: &OrderForm, mints: &[Arc<MintAction>]) -> Self {
        Self {
            account: state
                .account
                .get()
                .map(|a| truncate_address(Some(&a.to_string())))
                .unwrap_or_else(|| NOT_CONNECTED.to_string()),
            order_book: OrderBookPanel::from_state(state),
            trade_history: TradeHistoryPanel::from_state(state),
            balances: BalancePanel::from_state(state, mints),
            trade_form: TradeFormPanel::from_form(form),
            notifications: state.notifications.get(),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Account: {}", self.account)?;
        for n in &self.notifications {
            let tag = match n.level {
                NotificationLevel::Info => "info",
                NotificationLevel::Success => "ok",
                NotificationLevel::Error => "error",
            };
            writeln!(f, "[{}] {}", tag, n.message)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.order_book)?;
        writeln!(f, "{}", self.trade_history)?;
        writeln!(f, "{}", self.balances)?;
        write!(f, "{}", self.trade_form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::approval::ApprovalGate;
    use crate::shared::Token;
    use crate::testing::MockChain;
    use crate::view::{balance, order_book, trade_form, trade_history};
    use alloy_primitives::Address;

    #[test]
    fn test_page_has_all_panels() {
        let chain = MockChain::new();
        let state = Arc::new(AppState::new());
        let gates = vec![Arc::new(ApprovalGate::new(
            chain.token(Token::Btc),
            chain.clob_address(),
            Arc::clone(&state),
        ))];
        let form = OrderForm::new(chain.clob(), Arc::clone(&state), gates);

        let text = Page::build(&state, &form, &[]).to_string();
        assert!(text.contains(NOT_CONNECTED));
        for title in [order_book::TITLE, trade_history::TITLE, balance::TITLE, trade_form::TITLE] {
            assert!(text.contains(title), "missing {}", title);
        }
    }

    #[test]
    fn test_account_is_truncated() {
        let chain = MockChain::new();
        let state = Arc::new(AppState::new());
        state.set_account(Some(Address::repeat_byte(0xab)));
        let form = OrderForm::new(chain.clob(), Arc::clone(&state), vec![]);
        let page = Page::build(&state, &form, &[]);
        assert_eq!(page.account.len(), 13);
        assert!(page.account.contains("..."));
    }
}
