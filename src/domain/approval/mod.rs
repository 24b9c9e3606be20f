//! Approval gate — "approve, then act".
//!
//! Before the CLOB can pull a token from the trader, the trader must have
//! granted it a sufficient allowance. [`ApprovalGate`] compares the cached
//! allowance against the amount the wrapped action needs and decides what the
//! control shows. Approvals are always for an unlimited amount.

use crate::contract::{TokenContract, TxReceipt};
use crate::error::{ClientError, ContractError};
use crate::shared::{parse_positive_amount, InFlight, Token};
use crate::store::{AppState, NotificationLevel};
use alloy_primitives::{Address, U256};
use std::sync::Arc;

/// What an approval-gated control displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalView {
    /// Amount empty, unparseable or not positive. No call is issued.
    EnterAmount,
    /// No connected account.
    Unavailable,
    /// Allowance is insufficient; `pending` while the approval is unconfirmed.
    Approve { pending: bool },
    /// Allowance covers the amount; the wrapped action is available.
    Ready,
}

impl ApprovalView {
    pub fn is_ready(&self) -> bool {
        matches!(self, ApprovalView::Ready)
    }
}

pub struct ApprovalGate {
    token: Arc<dyn TokenContract>,
    spender: Address,
    state: Arc<AppState>,
    in_flight: InFlight,
}

impl ApprovalGate {
    /// Gate on `token` allowances granted to `spender` (the CLOB).
    pub fn new(token: Arc<dyn TokenContract>, spender: Address, state: Arc<AppState>) -> Self {
        Self {
            token,
            spender,
            state,
            in_flight: InFlight::default(),
        }
    }

    pub fn token(&self) -> Token {
        self.token.token()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_set()
    }

    /// Read `allowance(account, spender)` into the store.
    ///
    /// Without a connected account the cached value is cleared and no call is
    /// made.
    pub async fn refresh_allowance(&self) -> Result<Option<U256>, ContractError> {
        let token = self.token();
        let Some(owner) = self.state.account.get() else {
            self.state.set_allowance(token, None);
            return Ok(None);
        };

        match self.token.allowance(owner, self.spender).await {
            Ok(allowance) => {
                self.state.set_allowance(token, Some(allowance));
                Ok(Some(allowance))
            }
            Err(e) => {
                tracing::warn!("Failed to read {} allowance: {}", token, e);
                Err(e)
            }
        }
    }

    /// Decide what the control shows for `amount` (a decimal string).
    ///
    /// An allowance that has not been read yet counts as insufficient.
    pub fn view(&self, amount: &str) -> ApprovalView {
        let Some(needed) = parse_positive_amount(amount) else {
            return ApprovalView::EnterAmount;
        };
        if self.state.account.get().is_none() {
            return ApprovalView::Unavailable;
        }

        let allowance = self.state.allowance(self.token()).unwrap_or_default();
        if allowance >= needed {
            ApprovalView::Ready
        } else {
            ApprovalView::Approve {
                pending: self.is_pending(),
            }
        }
    }

    /// Send an unlimited approval and wait for its confirmation.
    ///
    /// `amount` is validated the same way as in [`view`](Self::view): nothing
    /// is sent for an empty or non-positive amount.
    pub async fn approve(&self, amount: &str) -> Result<TxReceipt, ClientError> {
        if parse_positive_amount(amount).is_none() {
            return Err(ClientError::Validation("Enter an amount".to_string()));
        }
        let owner = self.state.account.get().ok_or(ContractError::NoAccount)?;
        let _in_flight = self
            .in_flight
            .try_start()
            .ok_or_else(|| ClientError::Validation("Approval already pending".to_string()))?;

        let token = self.token();
        tracing::info!("Approving {} for {}", token, self.spender);

        match self.token.approve(owner, self.spender, U256::MAX).await {
            Ok(receipt) => {
                self.state.set_allowance(token, Some(U256::MAX));
                self.state
                    .notify(NotificationLevel::Success, format!("{} approved", token));
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!("{} approval failed: {}", token, e);
                self.state.notify(
                    NotificationLevel::Error,
                    format!("{} approval failed: {}", token, e),
                );
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for ApprovalGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalGate")
            .field("token", &self.token())
            .field("spender", &self.spender)
            .field("pending", &self.is_pending())
            .finish()
    }
}
