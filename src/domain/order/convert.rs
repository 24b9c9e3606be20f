//! Conversion: OrderRow → Order (TryFrom + validation).

use super::wire::OrderRow;
use super::Order;
use alloy_primitives::U256;
use std::fmt;

/// Why a raw row could not become an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderConversionError {
    OrderIdOutOfRange(U256),
}

impl fmt::Display for OrderConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderConversionError::OrderIdOutOfRange(id) => {
                write!(f, "Order id {} does not fit in u64", id)
            }
        }
    }
}

impl std::error::Error for OrderConversionError {}

impl TryFrom<OrderRow> for Order {
    type Error = OrderConversionError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let order_id = u64::try_from(row.order_id)
            .map_err(|_| OrderConversionError::OrderIdOutOfRange(row.order_id))?;

        Ok(Order {
            order_id,
            owner: row.owner,
            price: row.price,
            amount: row.amount,
            is_bid: row.is_bid,
        })
    }
}
