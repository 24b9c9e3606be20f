//! Mint button for the dev-net tokens.

use super::read_balance;
use crate::contract::{TokenContract, TxReceipt};
use crate::error::{ClientError, ContractError};
use crate::shared::{parse_positive_amount, InFlight, Token};
use crate::store::{AppState, NotificationLevel};
use std::sync::Arc;

/// Amount minted per click, in whole tokens.
pub const DEFAULT_MINT_AMOUNT: &str = "100";

pub struct MintAction {
    token: Arc<dyn TokenContract>,
    state: Arc<AppState>,
    amount: String,
    in_flight: InFlight,
}

impl MintAction {
    pub fn new(token: Arc<dyn TokenContract>, state: Arc<AppState>) -> Self {
        Self::with_amount(token, state, DEFAULT_MINT_AMOUNT)
    }

    pub fn with_amount(
        token: Arc<dyn TokenContract>,
        state: Arc<AppState>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            token,
            state,
            amount: amount.into(),
            in_flight: InFlight::default(),
        }
    }

    pub fn token(&self) -> Token {
        self.token.token()
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_set()
    }

    /// Enabled when an account is connected and no mint is in flight.
    pub fn is_enabled(&self) -> bool {
        self.state.account.get().is_some() && !self.is_submitting()
    }

    pub fn label(&self) -> String {
        if self.is_submitting() {
            "Minting...".to_string()
        } else {
            format!("Mint {}", self.amount)
        }
    }

    /// Mint to the connected account, then re-read its balance.
    pub async fn mint(&self) -> Result<TxReceipt, ClientError> {
        let owner = self.state.account.get().ok_or(ContractError::NoAccount)?;
        let amount = parse_positive_amount(&self.amount).ok_or_else(|| {
            ClientError::Validation(format!("Invalid mint amount '{}'", self.amount))
        })?;
        let _in_flight = self
            .in_flight
            .try_start()
            .ok_or_else(|| ClientError::Validation("Mint already in progress".to_string()))?;

        let token = self.token();
        match self.token.mint(owner, owner, amount).await {
            Ok(receipt) => {
                tracing::info!("Minted {} {} to {}", self.amount, token, owner);
                // A failed re-read is logged inside and only leaves a stale balance.
                let _ = read_balance(self.token.as_ref(), &self.state).await;
                self.state.notify(
                    NotificationLevel::Success,
                    format!("Minted {} {}", self.amount, token),
                );
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!("Mint of {} failed: {}", token, e);
                self.state
                    .notify(NotificationLevel::Error, format!("Mint failed: {}", e));
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for MintAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MintAction")
            .field("token", &self.token())
            .field("amount", &self.amount)
            .field("submitting", &self.is_submitting())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::wad;
    use crate::testing::MockChain;
    use alloy_primitives::{Address, U256};

    #[tokio::test]
    async fn test_mint_refreshes_balance() {
        let chain = MockChain::new();
        let trader = Address::repeat_byte(7);
        let state = Arc::new(AppState::new());
        state.set_account(Some(trader));

        let action = MintAction::new(chain.token(Token::Usdc), Arc::clone(&state));
        assert_eq!(action.label(), "Mint 100");
        action.mint().await.unwrap();

        assert_eq!(state.balance(Token::Usdc), Some(U256::from(100) * wad()));
        assert!(!action.is_submitting());
    }

    #[tokio::test]
    async fn test_mint_without_account() {
        let chain = MockChain::new();
        let action = MintAction::new(chain.token(Token::Btc), Arc::new(AppState::new()));
        assert!(!action.is_enabled());
        assert!(matches!(
            action.mint().await,
            Err(ClientError::Contract(ContractError::NoAccount))
        ));
    }

    #[tokio::test]
    async fn test_failed_mint_notifies() {
        let chain = MockChain::new();
        let state = Arc::new(AppState::new());
        state.set_account(Some(Address::repeat_byte(7)));
        chain.fail_writes(true);

        let action = MintAction::with_amount(chain.token(Token::Btc), Arc::clone(&state), "5");
        assert!(action.mint().await.is_err());
        assert_eq!(
            state.notifications.get().last().map(|n| n.level),
            Some(NotificationLevel::Error)
        );
        assert_eq!(state.balance(Token::Btc), None);
    }
}
