// ============================================================================
// Order Domain - the Order aggregate and its status codec
// ============================================================================
//
// - Value objects (OrderStatus and its stable integer codes)
// - Moment wire format (yyyy-MM-ddTHH:mm:ssZ)
// - Errors (OrderError enum)
// - Aggregate (Order)
//
// ============================================================================

pub mod value_objects;
pub mod moment;
pub mod errors;
pub mod aggregate;

// Re-export for convenience
pub use value_objects::*;
pub use moment::{format_moment, parse_moment, MOMENT_FORMAT};
pub use errors::*;
pub use aggregate::*;
