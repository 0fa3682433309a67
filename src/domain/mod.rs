// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// The Order aggregate lives in its own subdirectory. The entities it points
// at (client, line items, payment) are leaves with only the fields the
// aggregate reads.
//
// ============================================================================

pub mod order;
pub mod order_item;
pub mod payment;
pub mod user;

pub use order::{Order, OrderError, OrderStatus};
pub use order_item::{OrderItem, OrderItemKey};
pub use payment::Payment;
pub use user::User;
