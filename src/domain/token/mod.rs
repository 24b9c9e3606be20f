//! Token domain — BTC/USDC balances of the connected account, and minting.

pub mod mint;

pub use mint::{MintAction, DEFAULT_MINT_AMOUNT};

use crate::contract::TokenContract;
use crate::error::ContractError;
use crate::shared::Token;
use crate::store::AppState;
use alloy_primitives::U256;
use futures_util::future::join_all;
use std::sync::Arc;

/// Read `balanceOf(account)` for one token into the store.
async fn read_balance(
    token: &dyn TokenContract,
    state: &AppState,
) -> Result<Option<U256>, ContractError> {
    let Some(owner) = state.account.get() else {
        state.set_balance(token.token(), None);
        return Ok(None);
    };

    match token.balance_of(owner).await {
        Ok(balance) => {
            state.set_balance(token.token(), Some(balance));
            Ok(Some(balance))
        }
        Err(e) => {
            tracing::warn!("Failed to read {} balance: {}", token.token(), e);
            Err(e)
        }
    }
}

/// Balance reads for every configured token.
pub struct TokenBalances {
    tokens: Vec<Arc<dyn TokenContract>>,
    state: Arc<AppState>,
}

impl TokenBalances {
    pub fn new(tokens: Vec<Arc<dyn TokenContract>>, state: Arc<AppState>) -> Self {
        Self { tokens, state }
    }

    pub fn contract(&self, token: Token) -> Option<&Arc<dyn TokenContract>> {
        self.tokens.iter().find(|t| t.token() == token)
    }

    /// Cached balance; `None` until read.
    pub fn balance(&self, token: Token) -> Option<U256> {
        self.state.balance(token)
    }

    pub async fn refresh(&self, token: Token) -> Result<Option<U256>, ContractError> {
        let contract = self
            .contract(token)
            .ok_or_else(|| ContractError::Other(format!("No {} contract configured", token)))?;
        read_balance(contract.as_ref(), &self.state).await
    }

    /// Read every token concurrently. Failures are logged and leave the
    /// cached value untouched.
    pub async fn refresh_all(&self) {
        join_all(
            self.tokens
                .iter()
                .map(|t| read_balance(t.as_ref(), &self.state)),
        )
        .await;
    }
}

impl std::fmt::Debug for TokenBalances {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tokens: Vec<Token> = self.tokens.iter().map(|t| t.token()).collect();
        f.debug_struct("TokenBalances").field("tokens", &tokens).finish()
    }
}
