use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// A single purchased item. Opaque to the store beyond serialization.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LineItem {
    pub item_id: Uuid,
    pub quantity: u32,
    /// Unit price in minor currency units
    pub price: u32,
}

/// Fulfillment status, derived from the order timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Shipped,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(OrderStatus::Created),
            "shipped" => Ok(OrderStatus::Shipped),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(OrderError::InvalidStatus(other.to_string())),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_wire_format() {
        let item_id = Uuid::new_v4();
        let item = LineItem {
            item_id,
            quantity: 2,
            price: 1999,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["item_id"], item_id.to_string());
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["price"], 1999);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("created".parse::<OrderStatus>().unwrap(), OrderStatus::Created);
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert_eq!("completed".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        for raw in ["", "Shipped", "cancelled", "delivered", " shipped"] {
            let result = raw.parse::<OrderStatus>();
            assert!(matches!(result, Err(OrderError::InvalidStatus(s)) if s == raw));
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
        assert_eq!(OrderStatus::Shipped.to_string(), "shipped");
    }
}
