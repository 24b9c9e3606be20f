//! Token balance panel with a mint button per token.

use super::{Panel, LOADING};
use crate::domain::token::MintAction;
use crate::shared::{format_balance, Token};
use crate::store::AppState;
use std::fmt;
use std::sync::Arc;

pub const TITLE: &str = "Token Balances";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRow {
    pub token: Token,
    /// `None` while there is no account or the balance has not been read.
    pub balance: Option<String>,
    pub mint_label: Option<String>,
    pub mint_enabled: bool,
}

impl BalanceRow {
    fn line(&self) -> String {
        let balance = match &self.balance {
            Some(b) => format!("{} {}", b, self.token.symbol()),
            None => LOADING.to_string(),
        };
        let mut line = format!("{}: {}", self.token.display_name(), balance);
        if let Some(label) = &self.mint_label {
            let label = if self.mint_enabled {
                format!("[{}]", label)
            } else {
                format!("({})", label)
            };
            line = format!("{}  {}", line, label);
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancePanel {
    pub rows: Vec<BalanceRow>,
}

impl BalancePanel {
    pub fn from_state(state: &AppState, mints: &[Arc<MintAction>]) -> Self {
        let connected = state.account.get().is_some();
        let rows = Token::ALL
            .iter()
            .map(|&token| {
                let mint = mints.iter().find(|m| m.token() == token);
                BalanceRow {
                    token,
                    balance: state
                        .balance(token)
                        .filter(|_| connected)
                        .map(|b| format_balance(Some(b))),
                    mint_label: mint.map(|m| m.label()),
                    mint_enabled: mint.is_some_and(|m| m.is_enabled()),
                }
            })
            .collect();
        Self { rows }
    }

    pub fn to_panel(&self) -> Panel {
        let body: Vec<String> = self.rows.iter().map(BalanceRow::line).collect();
        Panel::new(TITLE, body.join("\n"))
    }
}

impl fmt::Display for BalancePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_panel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::parse_fixed;
    use crate::testing::MockChain;
    use alloy_primitives::Address;

    #[test]
    fn test_balances_show_four_digits() {
        let chain = MockChain::new();
        let state = Arc::new(AppState::new());
        state.set_account(Some(Address::repeat_byte(1)));
        state.set_balance(Token::Btc, Some(parse_fixed("1.23456").unwrap()));
        let mints = vec![Arc::new(MintAction::new(chain.token(Token::Btc), Arc::clone(&state)))];

        let panel = BalancePanel::from_state(&state, &mints);
        assert_eq!(panel.rows[0].balance.as_deref(), Some("1.2346"));
        assert_eq!(panel.rows[1].balance, None);
        let text = panel.to_string();
        assert!(text.contains("Bitcoin: 1.2346 BTC  [Mint 100]"));
        assert!(text.contains("USD Coin: Loading..."));
    }

    #[test]
    fn test_no_account_shows_placeholders() {
        let state = AppState::new();
        let panel = BalancePanel::from_state(&state, &[]);
        assert!(panel.rows.iter().all(|r| r.balance.is_none()));
    }
}
