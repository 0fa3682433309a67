use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Order, Payment};
use crate::metrics::Metrics;

use super::errors::StoreError;
use super::OrderStore;

// ============================================================================
// In-Memory Order Store
// ============================================================================
//
// Responsibilities:
// 1. Assign surrogate ids on first persist (monotonic, starting at 1)
// 2. Keep payments in their own table, written and deleted with the order
// 3. Never delete clients or items on their own
//
// Locking lives here. The aggregate itself is a plain value.
//
// ============================================================================

pub struct InMemoryOrderStore {
    orders: RwLock<BTreeMap<i64, Order>>,
    payments: RwLock<BTreeMap<i64, Payment>>,
    sequence: AtomicI64,
    metrics: Arc<Metrics>,
}

impl InMemoryOrderStore {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self {
            orders: RwLock::new(BTreeMap::new()),
            payments: RwLock::new(BTreeMap::new()),
            sequence: AtomicI64::new(0),
            metrics,
        }
    }

    /// Payment row owned by the order `order_id`, if any.
    pub async fn find_payment(&self, order_id: i64) -> Option<Payment> {
        self.payments.read().await.get(&order_id).cloned()
    }

    fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn not_found(&self, operation: &str, id: i64) -> anyhow::Error {
        tracing::warn!(order_id = id, operation, "Order not found");
        self.metrics.record_failure(operation, "not_found");
        StoreError::NotFound(id).into()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn save(&self, mut order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let mut payments = self.payments.write().await;

        let id = match order.id() {
            Some(id) if orders.contains_key(&id) => id,
            Some(id) => return Err(self.not_found("save", id)),
            None => self.next_id(),
        };
        // Items added since the last save carry no back-reference yet.
        order.set_id(Some(id));

        let mut row = order.clone();
        match row.take_payment() {
            Some(payment) => {
                payments.insert(id, payment);
            }
            None => {
                payments.remove(&id);
            }
        }
        orders.insert(id, row);

        self.metrics.record_operation("save");
        self.metrics.set_order_count(orders.len());
        tracing::debug!(
            order_id = id,
            items = order.items().len(),
            has_payment = order.payment().is_some(),
            "Saved order"
        );

        Ok(order)
    }

    async fn find(&self, id: i64) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        let payments = self.payments.read().await;

        self.metrics.record_operation("find");
        let Some(row) = orders.get(&id) else {
            tracing::debug!(order_id = id, "No order stored under id");
            return Ok(None);
        };

        let mut order = row.clone();
        if let Some(payment) = payments.get(&id) {
            order.set_payment(payment.clone());
        }
        Ok(Some(order))
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let payments = self.payments.read().await;

        self.metrics.record_operation("find_all");
        Ok(orders
            .iter()
            .map(|(id, row)| {
                let mut order = row.clone();
                if let Some(payment) = payments.get(id) {
                    order.set_payment(payment.clone());
                }
                order
            })
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut orders = self.orders.write().await;
        let mut payments = self.payments.write().await;

        if orders.remove(&id).is_none() {
            return Err(self.not_found("delete", id));
        }
        let cascaded = payments.remove(&id).is_some();

        self.metrics.record_operation("delete");
        self.metrics.set_order_count(orders.len());
        tracing::debug!(order_id = id, payment_deleted = cascaded, "Deleted order");

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderItem, OrderStatus, User};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn create_test_store() -> InMemoryOrderStore {
        InMemoryOrderStore::new(Arc::new(Metrics::new().unwrap()))
    }

    fn create_test_client() -> Arc<User> {
        Arc::new(User::new(Some(1), "Maria Brown", "maria@gmail.com", "988888888", "123456"))
    }

    fn create_test_order() -> Order {
        let mut order = Order::new(
            None,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()),
            Some(create_test_client()),
            Some(OrderStatus::WaitingPayment),
        );
        order.add_item(OrderItem::new(None, 1, 2, dec!(90.50)));
        order.add_item(OrderItem::new(None, 3, 1, dec!(1250.00)));
        order
    }

    #[tokio::test]
    async fn test_save_assigns_ids_in_sequence() {
        let store = create_test_store();

        let first = store.save(create_test_order()).await.unwrap();
        let second = store.save(create_test_order()).await.unwrap();

        assert_eq!(first.id(), Some(1));
        assert_eq!(second.id(), Some(2));
        assert_ne!(first, second);
        assert!(first.items().iter().all(|item| item.order_id == Some(1)));
    }

    #[tokio::test]
    async fn test_id_is_stable_across_updates() {
        let store = create_test_store();
        let mut order = store.save(create_test_order()).await.unwrap();

        order.set_status(Some(OrderStatus::Paid));
        let updated = store.save(order).await.unwrap();

        assert_eq!(updated.id(), Some(1));
        let loaded = store.find(1).await.unwrap().unwrap();
        assert_eq!(loaded.status().unwrap(), OrderStatus::Paid);
        assert_eq!(loaded.total(), dec!(1431.00));
    }

    #[tokio::test]
    async fn test_update_binds_new_items() {
        let store = create_test_store();
        let mut order = store.save(create_test_order()).await.unwrap();

        order
            .items_mut()
            .insert(OrderItem::new(None, 5, 1, dec!(2.00)));
        let updated = store.save(order).await.unwrap();

        assert_eq!(updated.total(), dec!(1433.00));
        let loaded = store.find(1).await.unwrap().unwrap();
        assert_eq!(loaded.items().len(), 3);
        assert!(loaded.items().iter().all(|item| item.order_id == Some(1)));
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_fails() {
        let store = create_test_store();
        let mut order = create_test_order();
        order.set_id(Some(42));

        let err = store.save(order).await.unwrap_err();
        assert_eq!(err.downcast_ref::<StoreError>(), Some(&StoreError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_payment_cascades_on_save_and_delete() {
        let store = create_test_store();
        let mut order = store.save(create_test_order()).await.unwrap();

        order.set_status(Some(OrderStatus::Paid));
        order.set_payment(Payment::new(None, Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()));
        store.save(order).await.unwrap();

        let payment = store.find_payment(1).await.unwrap();
        assert_eq!(payment.id, Some(1));
        assert_eq!(payment.order_id, Some(1));

        let loaded = store.find(1).await.unwrap().unwrap();
        assert_eq!(loaded.payment(), Some(&payment));

        store.delete(1).await.unwrap();
        assert!(store.find(1).await.unwrap().is_none());
        assert!(store.find_payment(1).await.is_none());
    }

    #[tokio::test]
    async fn test_removing_payment_deletes_its_row() {
        let store = create_test_store();
        let mut order = create_test_order();
        order.set_payment(Payment::new(None, Utc::now()));
        let mut order = store.save(order).await.unwrap();
        assert!(store.find_payment(1).await.is_some());

        order.take_payment();
        store.save(order).await.unwrap();
        assert!(store.find_payment(1).await.is_none());
    }

    #[tokio::test]
    async fn test_delete_does_not_touch_client() {
        let store = create_test_store();
        let client = create_test_client();
        let order = Order::new(
            None,
            Some(Utc::now()),
            Some(client.clone()),
            Some(OrderStatus::Shipped),
        );
        store.save(order).await.unwrap();

        store.delete(1).await.unwrap();
        assert_eq!(Arc::strong_count(&client), 1);
        assert_eq!(client.name, "Maria Brown");
    }

    #[tokio::test]
    async fn test_delete_unknown_order_fails() {
        let store = create_test_store();
        let err = store.delete(7).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::NotFound(7))));
    }

    #[tokio::test]
    async fn test_find_all_orders_by_id() {
        let store = create_test_store();
        for _ in 0..3 {
            store.save(create_test_order()).await.unwrap();
        }

        let ids: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(Order::id)
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn test_store_records_metrics() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let store = InMemoryOrderStore::new(metrics.clone());

        store.save(create_test_order()).await.unwrap();
        store.save(create_test_order()).await.unwrap();
        let _ = store.delete(99).await;

        let gathered = metrics.registry().gather();
        let orders = gathered.iter().find(|m| m.name() == "order_store_orders").unwrap();
        assert_eq!(orders.metric[0].gauge.value, Some(2.0));

        let failures = gathered
            .iter()
            .find(|m| m.name() == "order_store_failures_total")
            .unwrap();
        assert_eq!(failures.metric[0].counter.value, Some(1.0));
    }
}
