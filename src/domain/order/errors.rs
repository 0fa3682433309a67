// ============================================================================
// Order Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid order status code: {0}")]
    InvalidStatusCode(i32),

    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    #[error("Invalid moment '{0}', expected yyyy-MM-ddTHH:mm:ssZ")]
    InvalidMoment(String),
}
