use chrono::{DateTime, Utc};

use super::aggregate::Order;
use super::errors::OrderError;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Lifecycle
// ============================================================================
//
//   created ──► shipped ──► completed
//
// Pure validation: takes a fetched order and a target status and returns
// the order that should be written back. Persisting it is up to the caller.
//
// ============================================================================

/// Validate a move to `target` and stamp the matching timestamp with `now`.
pub fn transition(
    order: &Order,
    target: OrderStatus,
    now: DateTime<Utc>,
) -> Result<Order, OrderError> {
    let current = order.status()?;
    let mut next = order.clone();

    match (current, target) {
        (OrderStatus::Created, OrderStatus::Shipped) => {
            next.shipped_at = Some(now);
        }
        (OrderStatus::Shipped, OrderStatus::Completed) => {
            // A clock step backwards must not produce completed_at < shipped_at
            let shipped_at = order.shipped_at.unwrap_or(now);
            next.completed_at = Some(now.max(shipped_at));
        }
        (from, to) => return Err(OrderError::InvalidTransition { from, to }),
    }

    Ok(next)
}

/// Same as [`transition`], for a status still in its wire form.
pub fn transition_str(
    order: &Order,
    requested: &str,
    now: DateTime<Utc>,
) -> Result<Order, OrderError> {
    let target: OrderStatus = requested.parse()?;
    transition(order, target, now)
}

// ============================================================================
// Unit Tests
// ============================================================================
