use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Lifecycle status of an order.
///
/// The discriminant is the persisted code. Codes are stable across versions,
/// so existing members must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    WaitingPayment = 1,
    Paid = 2,
    Shipped = 3,
    Delivered = 4,
    Canceled = 5,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::WaitingPayment,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    /// Stable integer code used for storage.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Decode a stored code. Unknown codes are an error, never a default.
    pub fn from_code(code: i32) -> Result<Self, OrderError> {
        match code {
            1 => Ok(OrderStatus::WaitingPayment),
            2 => Ok(OrderStatus::Paid),
            3 => Ok(OrderStatus::Shipped),
            4 => Ok(OrderStatus::Delivered),
            5 => Ok(OrderStatus::Canceled),
            other => Err(OrderError::InvalidStatusCode(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::WaitingPayment => "WAITING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl TryFrom<i32> for OrderStatus {
    type Error = OrderError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<OrderStatus> for i32 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| OrderError::UnknownStatus(s.to_string()))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
