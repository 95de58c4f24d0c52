use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::OrderError;
use super::value_objects::{LineItem, OrderStatus};

// ============================================================================
// Order Aggregate
// ============================================================================
//
// Status is never stored. It is derived from which timestamps are set:
//
//   shipped_at | completed_at | status
//   -----------+--------------+----------
//   none       | none         | created
//   some       | none         | shipped
//   some       | some         | completed
//   none       | some         | (invalid)
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: u64,
    pub customer_id: Uuid,
    pub line_items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a new order with a freshly drawn id, stamped now.
    pub fn new(customer_id: Uuid, line_items: Vec<LineItem>) -> Self {
        Self::with_id(generate_order_id(), customer_id, line_items, Utc::now())
    }

    pub fn with_id(
        order_id: u64,
        customer_id: Uuid,
        line_items: Vec<LineItem>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id,
            customer_id,
            line_items,
            created_at,
            shipped_at: None,
            completed_at: None,
        }
    }

    pub fn status(&self) -> Result<OrderStatus, OrderError> {
        match (self.shipped_at, self.completed_at) {
            (None, None) => Ok(OrderStatus::Created),
            (Some(_), None) => Ok(OrderStatus::Shipped),
            (Some(_), Some(_)) => Ok(OrderStatus::Completed),
            (None, Some(_)) => Err(OrderError::InvalidState(self.order_id)),
        }
    }
}

/// Random 64-bit id drawn from a v4 UUID.
///
/// Each half of a v4 UUID carries fixed version or variant bits (bits 12..15
/// of the high half, bits 62..63 of the low half). Rotating the low half by 12
/// lines its random low nibble up with the fixed version nibble, so every bit
/// of the result is random.
///
/// Not checked for uniqueness here; the store refuses to overwrite an
/// existing record on insert.
pub fn generate_order_id() -> u64 {
    let (high, low) = Uuid::new_v4().as_u64_pair();
    high ^ low.rotate_left(12)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_items() -> Vec<LineItem> {
        vec![
            LineItem {
                item_id: Uuid::new_v4(),
                quantity: 2,
                price: 500,
            },
            LineItem {
                item_id: Uuid::new_v4(),
                quantity: 1,
                price: 1250,
            },
        ]
    }

    #[test]
    fn test_new_order_is_created() {
        let customer_id = Uuid::new_v4();
        let order = Order::new(customer_id, sample_items());

        assert_eq!(order.customer_id, customer_id);
        assert_eq!(order.line_items.len(), 2);
        assert!(order.shipped_at.is_none());
        assert!(order.completed_at.is_none());
        assert_eq!(order.status().unwrap(), OrderStatus::Created);
    }

    #[test]
    fn test_status_derivation() {
        let now = Utc::now();
        let mut order = Order::with_id(7, Uuid::new_v4(), vec![], now);

        order.shipped_at = Some(now);
        assert_eq!(order.status().unwrap(), OrderStatus::Shipped);

        order.completed_at = Some(now);
        assert_eq!(order.status().unwrap(), OrderStatus::Completed);

        order.shipped_at = None;
        assert_eq!(order.status(), Err(OrderError::InvalidState(7)));
    }

    #[test]
    fn test_generated_ids_differ() {
        let ids: std::collections::HashSet<u64> = (0..1000).map(|_| generate_order_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_generated_ids_use_every_bit() {
        let ids: Vec<u64> = (0..10_000).map(|_| generate_order_id()).collect();

        // Version nibble of the UUID must not leak into the id
        assert!(!ids.iter().all(|id| id & 0xF000 == 0x4000));

        // Every bit position is set in some id and clear in another
        let any_set = ids.iter().fold(0u64, |acc, id| acc | id);
        let any_clear = ids.iter().fold(0u64, |acc, id| acc | !id);
        assert_eq!(any_set, u64::MAX);
        assert_eq!(any_clear, u64::MAX);
    }

    #[test]
    fn test_order_json_shape() {
        let order = Order::new(Uuid::new_v4(), sample_items());
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["order_id"], order.order_id);
        assert!(json["line_items"].is_array());
        assert!(json["created_at"].is_string());
        assert!(json["shipped_at"].is_null());
        assert!(json["completed_at"].is_null());

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }
}
