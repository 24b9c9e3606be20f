//! Order-entry panel: side selector, inputs and the approve-then-submit button.

use super::Panel;
use crate::domain::approval::ApprovalView;
use crate::domain::form::OrderForm;
use crate::shared::{calculate_order_value, parse_fixed, TradeSide};
use std::fmt;

pub const TITLE: &str = "Trade";
pub const ENTER_PRICE: &str = "Enter price";
pub const ENTER_AMOUNT: &str = "Enter amount";
pub const CONNECT_WALLET: &str = "Connect wallet";
pub const APPROVING: &str = "Approving...";

/// What the main button of the form does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Disabled prompt; nothing is sent.
    EnterAmount,
    Connect,
    Approve,
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeFormPanel {
    pub side: TradeSide,
    pub price: String,
    pub amount: String,
    pub order_value: String,
    pub action: FormAction,
    pub action_label: String,
    pub action_enabled: bool,
}

impl TradeFormPanel {
    pub fn from_form(form: &OrderForm) -> Self {
        let inputs = form.inputs();
        let side = form.side();
        let token = side.payment_token();

        let (action, action_label, action_enabled) = match form.approval_view() {
            ApprovalView::EnterAmount => (FormAction::EnterAmount, ENTER_AMOUNT.to_string(), false),
            ApprovalView::Unavailable => (FormAction::Connect, CONNECT_WALLET.to_string(), false),
            ApprovalView::Approve { pending: true } => (FormAction::Approve, APPROVING.to_string(), false),
            ApprovalView::Approve { pending: false } => {
                (FormAction::Approve, format!("Approve {}", token), true)
            }
            ApprovalView::Ready => (FormAction::Submit, form.submit_label(), form.can_submit()),
        };

        Self {
            side,
            order_value: calculate_order_value(
                parse_fixed(&inputs.price).ok(),
                parse_fixed(&inputs.amount).ok(),
            ),
            price: inputs.price,
            amount: inputs.amount,
            action,
            action_label,
            action_enabled,
        }
    }

    pub fn to_panel(&self) -> Panel {
        let tabs = match self.side {
            TradeSide::Buy => "[Buy] Sell",
            TradeSide::Sell => "Buy [Sell]",
        };
        let input = |value: &str, placeholder: &str| {
            if value.is_empty() {
                format!("<{}>", placeholder)
            } else {
                value.to_string()
            }
        };
        let button = if self.action_enabled {
            format!("[{}]", self.action_label)
        } else {
            format!("({})", self.action_label)
        };

        Panel::new(
            TITLE,
            format!(
                "{}\nPrice: {}\nAmount: {}\nOrder value: {}\n{}",
                tabs,
                input(&self.price, ENTER_PRICE),
                input(&self.amount, ENTER_AMOUNT),
                self.order_value,
                button
            ),
        )
    }
}

impl fmt::Display for TradeFormPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_panel())
    }
}
