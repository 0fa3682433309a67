// ============================================================================
// Store Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    NotFound(i64),
}
