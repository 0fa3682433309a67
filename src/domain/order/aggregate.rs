use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::order_item::OrderItem;
use crate::domain::payment::Payment;
use crate::domain::user::User;

use super::errors::OrderError;
use super::moment;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Aggregate
// ============================================================================
//
// Consistency boundary for one order:
// - identity is the surrogate `id` alone, assigned by the store
// - status is kept as its integer code and decoded on read
// - the total is derived from the current items on every call
//
// Items and payment point back to the order by id only. The order side of
// each association is authoritative.
//
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "OrderRecord")]
pub struct Order {
    id: Option<i64>,
    moment: Option<DateTime<Utc>>,
    client: Option<Arc<User>>,
    status_code: i32,
    items: HashSet<OrderItem>,
    payment: Option<Payment>,
}

impl Order {
    /// Build an order with no items and no payment.
    ///
    /// `status` goes through [`Order::set_status`], so `None` leaves the
    /// order without a valid status. Client and moment may be absent;
    /// checking them is left to the caller.
    pub fn new(
        id: Option<i64>,
        moment: Option<DateTime<Utc>>,
        client: Option<Arc<User>>,
        status: Option<OrderStatus>,
    ) -> Self {
        let mut order = Self {
            id,
            moment,
            client,
            ..Self::default()
        };
        order.set_status(status);
        order
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Assign the surrogate id and rebind the back-references of items and
    /// payment to it.
    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
        self.items = self
            .items
            .drain()
            .map(|mut item| {
                item.order_id = id;
                item
            })
            .collect();
        if let Some(payment) = self.payment.as_mut() {
            payment.attach_to(id);
        }
    }

    pub fn moment(&self) -> Option<DateTime<Utc>> {
        self.moment
    }

    pub fn set_moment(&mut self, moment: Option<DateTime<Utc>>) {
        self.moment = moment;
    }

    pub fn client(&self) -> Option<&Arc<User>> {
        self.client.as_ref()
    }

    pub fn set_client(&mut self, client: Option<Arc<User>>) {
        self.client = client;
    }

    /// Decode the stored status code.
    pub fn status(&self) -> Result<OrderStatus, OrderError> {
        OrderStatus::from_code(self.status_code)
    }

    /// Store the code of `status`. `None` is a no-op and never clears the
    /// current status.
    pub fn set_status(&mut self, status: Option<OrderStatus>) {
        if let Some(status) = status {
            self.status_code = status.code();
        }
    }

    /// Raw persisted status code.
    pub fn status_code(&self) -> i32 {
        self.status_code
    }

    pub fn items(&self) -> &HashSet<OrderItem> {
        &self.items
    }

    /// Live item set. Changes are seen by the next [`Order::total`].
    pub fn items_mut(&mut self) -> &mut HashSet<OrderItem> {
        &mut self.items
    }

    /// Associate `item` with this order. Returns `false` when an item with
    /// the same identity is already present.
    pub fn add_item(&mut self, mut item: OrderItem) -> bool {
        item.order_id = self.id;
        self.items.insert(item)
    }

    pub fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }

    /// Attach the payment. It is persisted and deleted together with the order.
    pub fn set_payment(&mut self, mut payment: Payment) {
        payment.attach_to(self.id);
        self.payment = Some(payment);
    }

    pub fn take_payment(&mut self) -> Option<Payment> {
        self.payment.take()
    }

    /// Sum of item subtotals. Zero without items.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(OrderItem::subtotal).sum()
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

impl Eq for Order {}

impl Hash for Order {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.unwrap_or(0).hash(state);
    }
}

// ============================================================================
// Wire representation
// ============================================================================

#[derive(Deserialize)]
struct OrderRecord {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default, with = "moment::option")]
    moment: Option<DateTime<Utc>>,
    #[serde(default)]
    client: Option<Arc<User>>,
    #[serde(default)]
    status: Option<OrderStatus>,
    #[serde(default)]
    items: HashSet<OrderItem>,
    #[serde(default)]
    payment: Option<Payment>,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        let mut order = Order {
            id: record.id,
            moment: record.moment,
            client: record.client,
            ..Order::default()
        };
        order.set_status(record.status);
        for item in record.items {
            order.add_item(item);
        }
        if let Some(payment) = record.payment {
            order.set_payment(payment);
        }
        order
    }
}

/// Outgoing document. The status is decoded by name and the total is
/// computed at render time.
#[derive(Serialize)]
struct OrderView<'a> {
    id: Option<i64>,
    #[serde(with = "moment::option")]
    moment: Option<DateTime<Utc>>,
    client: Option<&'a Arc<User>>,
    status: OrderStatus,
    items: &'a HashSet<OrderItem>,
    payment: Option<&'a Payment>,
    total: Decimal,
}

impl Serialize for Order {
    /// Fails when the stored status code is not a defined member.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let status = self.status().map_err(serde::ser::Error::custom)?;
        OrderView {
            id: self.id,
            moment: self.moment,
            client: self.client.as_ref(),
            status,
            items: &self.items,
            payment: self.payment.as_ref(),
            total: self.total(),
        }
        .serialize(serializer)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
