// ============================================================================
// Order Store - Persistence Boundary
// ============================================================================
//
// The aggregate knows nothing about storage. This module defines the
// contract the storage layer honours and an in-memory implementation.
//
// ============================================================================

pub mod errors;
pub mod memory;

pub use errors::StoreError;
pub use memory::InMemoryOrderStore;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::Order;

/// Storage contract for orders.
///
/// - `save` assigns an id on first persist and cascades to the payment
/// - `delete` cascades to the payment, never to the client or the items
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn save(&self, order: Order) -> Result<Order>;

    async fn find(&self, id: i64) -> Result<Option<Order>>;

    async fn find_all(&self) -> Result<Vec<Order>>;

    async fn delete(&self, id: i64) -> Result<()>;
}
