use std::hash::{Hash, Hasher};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// OrderItem - one product line of an order
// ============================================================================

/// Storage key of a line: owning order plus product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderItemKey {
    pub order_id: Option<i64>,
    pub product_id: i64,
}

/// Within an order's item set a line is identified by its product alone.
/// `order_id` is a back-reference rebound by the order, so it takes no part
/// in `Eq` or `Hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(skip)]
    pub order_id: Option<i64>,
    pub product_id: i64,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn new(order_id: Option<i64>, product_id: i64, quantity: u32, price: Decimal) -> Self {
        Self {
            order_id,
            product_id,
            quantity,
            price,
        }
    }

    pub fn key(&self) -> OrderItemKey {
        OrderItemKey {
            order_id: self.order_id,
            product_id: self.product_id,
        }
    }

    /// Line contribution to the order total.
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl PartialEq for OrderItem {
    fn eq(&self, other: &Self) -> bool {
        self.product_id == other.product_id
    }
}

impl Eq for OrderItem {}

impl Hash for OrderItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.product_id.hash(state);
    }
}
