//! Order entry form.
//!
//! Holds the price/amount inputs as typed text, gates submission on the
//! allowance of the token the selected side pays with, and sends one
//! `placeOrder` per submission.

use crate::contract::{ClobContract, TxReceipt};
use crate::domain::approval::{ApprovalGate, ApprovalView};
use crate::error::{ClientError, ContractError};
use crate::shared::{parse_positive_amount, InFlight, TradeSide};
use crate::store::{AppState, Cell, NotificationLevel};
use std::sync::Arc;

/// Raw text of the two form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderInputs {
    pub price: String,
    pub amount: String,
}

pub struct OrderForm {
    clob: Arc<dyn ClobContract>,
    state: Arc<AppState>,
    gates: Vec<Arc<ApprovalGate>>,
    inputs: Cell<OrderInputs>,
    in_flight: InFlight,
}

impl OrderForm {
    /// `gates` holds one approval gate per payment token.
    pub fn new(clob: Arc<dyn ClobContract>, state: Arc<AppState>, gates: Vec<Arc<ApprovalGate>>) -> Self {
        Self {
            clob,
            state,
            gates,
            inputs: Cell::default(),
            in_flight: InFlight::default(),
        }
    }

    // ─── Inputs ──────────────────────────────────────────────────────────────

    pub fn inputs(&self) -> OrderInputs {
        self.inputs.get()
    }

    pub fn set_price(&self, price: impl Into<String>) {
        let price = price.into();
        self.inputs.update(|i| OrderInputs {
            price,
            amount: i.amount.clone(),
        });
    }

    pub fn set_amount(&self, amount: impl Into<String>) {
        let amount = amount.into();
        self.inputs.update(|i| OrderInputs {
            price: i.price.clone(),
            amount,
        });
    }

    /// Copy the price last picked from the order book into the price input.
    pub fn use_selected_price(&self) {
        let selected = self.state.selected_price.get();
        if !selected.is_empty() {
            self.set_price(selected);
        }
    }

    pub fn side(&self) -> TradeSide {
        self.state.trade_side.get()
    }

    pub fn set_side(&self, side: TradeSide) {
        self.state.set_trade_side(side);
    }

    // ─── Gating ──────────────────────────────────────────────────────────────

    /// Approval gate for the token the current side pays with.
    pub fn gate(&self) -> Option<&Arc<ApprovalGate>> {
        let token = self.side().payment_token();
        self.gates.iter().find(|g| g.token() == token)
    }

    pub fn approval_view(&self) -> ApprovalView {
        let amount = self.inputs.with(|i| i.amount.clone());
        match self.gate() {
            Some(gate) => gate.view(&amount),
            None => ApprovalView::Unavailable,
        }
    }

    /// Approve the current side's payment token for the entered amount.
    pub async fn approve(&self) -> Result<TxReceipt, ClientError> {
        let amount = self.inputs.with(|i| i.amount.clone());
        let gate = self.gate().ok_or_else(|| {
            ClientError::Other(format!("No {} contract configured", self.side().payment_token()))
        })?;
        gate.approve(&amount).await
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_set()
    }

    /// Both inputs valid, allowance sufficient and nothing in flight.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
            && self.inputs.with(|i| parse_positive_amount(&i.price).is_some())
            && self.approval_view().is_ready()
    }

    pub fn submit_label(&self) -> String {
        if self.is_submitting() {
            "Submitting...".to_string()
        } else {
            self.side().to_string()
        }
    }

    // ─── Submission ──────────────────────────────────────────────────────────

    /// Place the order described by the inputs.
    ///
    /// Inputs are parsed here, at submission time. On success both inputs are
    /// cleared; on failure they are kept so the trader can resubmit.
    pub async fn submit(&self) -> Result<TxReceipt, ClientError> {
        let owner = self.state.account.get().ok_or(ContractError::NoAccount)?;
        let OrderInputs { price, amount } = self.inputs();
        let price_value = parse_positive_amount(&price)
            .ok_or_else(|| ClientError::Validation(format!("Invalid price '{}'", price)))?;
        let amount_value = parse_positive_amount(&amount)
            .ok_or_else(|| ClientError::Validation(format!("Invalid amount '{}'", amount)))?;
        let _in_flight = self
            .in_flight
            .try_start()
            .ok_or_else(|| ClientError::Validation("Order already submitting".to_string()))?;

        let side = self.side();
        tracing::info!("Placing {} order: {} @ {}", side, amount, price);

        match self
            .clob
            .place_order(owner, price_value, amount_value, side.is_bid())
            .await
        {
            Ok(receipt) => {
                self.inputs.replace(OrderInputs::default());
                self.state
                    .notify(NotificationLevel::Success, format!("{} order placed", side));
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!("Order submission failed: {}", e);
                self.state
                    .notify(NotificationLevel::Error, format!("Order failed: {}", e));
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for OrderForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderForm")
            .field("inputs", &self.inputs())
            .field("side", &self.side())
            .field("submitting", &self.is_submitting())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{wad, Token};
    use crate::testing::MockChain;
    use alloy_primitives::{Address, U256};

    fn trader() -> Address {
        Address::repeat_byte(0x42)
    }

    fn form(chain: &Arc<MockChain>) -> (OrderForm, Arc<AppState>) {
        let state = Arc::new(AppState::new());
        state.set_account(Some(trader()));
        let gates = Token::ALL
            .iter()
            .map(|t| {
                Arc::new(ApprovalGate::new(
                    chain.token(*t),
                    chain.clob_address(),
                    Arc::clone(&state),
                ))
            })
            .collect();
        (OrderForm::new(chain.clob(), Arc::clone(&state), gates), state)
    }

    #[tokio::test]
    async fn test_buy_is_gated_on_btc() {
        let chain = MockChain::new();
        let (form, _state) = form(&chain);
        form.set_amount("2");
        assert_eq!(form.gate().unwrap().token(), Token::Btc);
        assert_eq!(form.approval_view(), ApprovalView::Approve { pending: false });

        form.set_side(TradeSide::Sell);
        assert_eq!(form.gate().unwrap().token(), Token::Usdc);
    }

    #[tokio::test]
    async fn test_submit_clears_inputs_on_success() {
        let chain = MockChain::new();
        let (form, _state) = form(&chain);
        form.set_price("1.5");
        form.set_amount("2");
        form.approve().await.unwrap();
        assert!(form.can_submit());

        form.submit().await.unwrap();
        assert_eq!(form.inputs(), OrderInputs::default());
        let placed = chain.placed_orders();
        assert_eq!(
            placed,
            vec![(
                trader(),
                U256::from(1_500_000_000_000_000_000u128),
                U256::from(2) * wad(),
                true
            )]
        );
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_inputs() {
        let chain = MockChain::new();
        let (form, state) = form(&chain);
        form.set_side(TradeSide::Sell);
        form.set_price("10");
        form.set_amount("1");
        // No USDC allowance: the contract reverts.
        let err = form.submit().await.unwrap_err();
        assert!(matches!(err, ClientError::Contract(ContractError::Reverted { .. })));
        assert_eq!(form.inputs().price, "10");
        assert_eq!(form.inputs().amount, "1");
        assert_eq!(
            state.notifications.get().last().map(|n| n.level),
            Some(NotificationLevel::Error)
        );
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_empty_amount_sends_nothing() {
        let chain = MockChain::new();
        let (form, _state) = form(&chain);
        form.set_price("10");
        assert_eq!(form.approval_view(), ApprovalView::EnterAmount);
        assert!(!form.can_submit());
        assert!(matches!(form.submit().await, Err(ClientError::Validation(_))));
        assert_eq!(chain.block_number(), 0);
    }

    #[test]
    fn test_use_selected_price() {
        let chain = MockChain::new();
        let (form, state) = form(&chain);
        state.select_level(U256::from(3) * wad(), true);
        form.use_selected_price();
        assert_eq!(form.inputs().price, "3.000000");
        assert_eq!(form.side(), TradeSide::Sell);
        assert_eq!(form.submit_label(), "Sell");
    }
}
