// ============================================================================
// Order Domain
// ============================================================================
//
// - Value objects (LineItem, OrderStatus)
// - Errors (OrderError)
// - Aggregate (Order and its derived status)
// - Lifecycle (status transition rules)
//
// Nothing in here touches the key-value backend.
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod aggregate;
pub mod lifecycle;

pub use value_objects::*;
pub use errors::*;
pub use aggregate::*;
pub use lifecycle::*;
