use futures_util::future::try_join_all;
use std::sync::Arc;

use super::backend::{CasOutcome, KvBackend, SetMode};
use super::errors::{StoreError, StoreResult};
use crate::domain::order::Order;

// ============================================================================
// Order Store - Repository over a Key-Value Backend
// ============================================================================
//
// Key scheme (deterministic from order_id, no shared state needed):
//   order:<order_id>   serialized Order (JSON)
//   orders             insertion-ordered index of order ids
//   orders:seq         index position counter (Redis backend)
//
// The store never logs; callers decide what to report.
//
// ============================================================================

pub const ORDER_INDEX: &str = "orders";

pub fn order_key(order_id: u64) -> String {
    format!("order:{}", order_id)
}

/// Cursor request for [`OrderStore::list`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPage {
    pub offset: u64,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    /// Position to resume from; `None` once the listing is exhausted
    pub next: Option<u64>,
}

#[derive(Clone)]
pub struct OrderStore {
    backend: Arc<dyn KvBackend>,
}

impl OrderStore {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.backend.ping().await
    }

    /// Write a new order and append it to the listing index.
    ///
    /// The record and index writes are separate; a failure between them
    /// leaves a record that is reachable by id but not listed.
    pub async fn insert(&self, order: &Order) -> StoreResult<()> {
        let data = serde_json::to_string(order)?;
        let key = order_key(order.order_id);

        if !self.backend.set(&key, &data, SetMode::IfAbsent).await? {
            return Err(StoreError::AlreadyExists(order.order_id));
        }

        self.backend
            .index_add(ORDER_INDEX, &order.order_id.to_string())
            .await
    }

    pub async fn find(&self, order_id: u64) -> StoreResult<Order> {
        match self.backend.get(&order_key(order_id)).await? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Err(StoreError::NotFound(order_id)),
        }
    }

    /// One page of orders in insertion order.
    ///
    /// Index entries whose record is gone are skipped, so a page may hold
    /// fewer than `size` orders while `next` is still set. `next` always
    /// advances by the number of index positions read.
    pub async fn list(&self, page: ListPage) -> StoreResult<OrderPage> {
        if page.size == 0 {
            return Err(StoreError::InvalidPage);
        }

        let members = self
            .backend
            .index_range(ORDER_INDEX, page.offset, page.size)
            .await?;

        let fetches = members.iter().map(|member| self.fetch_indexed(member));
        let orders = try_join_all(fetches)
            .await?
            .into_iter()
            .flatten()
            .collect();

        let read = members.len() as u64;
        let next = if read < page.size {
            None
        } else {
            Some(page.offset + read)
        };

        Ok(OrderPage { orders, next })
    }

    async fn fetch_indexed(&self, member: &str) -> StoreResult<Option<Order>> {
        let order_id: u64 = member
            .parse()
            .map_err(|_| StoreError::Backend(format!("Malformed index entry: {:?}", member)))?;

        match self.find(order_id).await {
            Ok(order) => Ok(Some(order)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Overwrite an existing order wholesale. Last writer wins.
    pub async fn update(&self, order: &Order) -> StoreResult<()> {
        let data = serde_json::to_string(order)?;

        if self
            .backend
            .set(&order_key(order.order_id), &data, SetMode::IfPresent)
            .await?
        {
            Ok(())
        } else {
            Err(StoreError::NotFound(order.order_id))
        }
    }

    /// Overwrite `previous` with `next`, failing with `Conflict` if the
    /// stored record no longer matches `previous`.
    ///
    /// Records are compared decoded, so one written with a different key
    /// order or timestamp precision still matches. The swap itself is
    /// guarded by the exact bytes read.
    pub async fn update_from(&self, previous: &Order, next: &Order) -> StoreResult<()> {
        let key = order_key(next.order_id);
        let current = match self.backend.get(&key).await? {
            Some(current) => current,
            None => return Err(StoreError::NotFound(next.order_id)),
        };

        let stored: Order = serde_json::from_str(&current)?;
        if stored != *previous {
            return Err(StoreError::Conflict(next.order_id));
        }

        let data = serde_json::to_string(next)?;
        match self.backend.compare_and_set(&key, &current, &data).await? {
            CasOutcome::Swapped => Ok(()),
            CasOutcome::Mismatch => Err(StoreError::Conflict(next.order_id)),
            CasOutcome::Missing => Err(StoreError::NotFound(next.order_id)),
        }
    }

    /// Remove the record and its index entry together.
    pub async fn delete(&self, order_id: u64) -> StoreResult<()> {
        let removed = self
            .backend
            .delete_indexed(&order_key(order_id), ORDER_INDEX, &order_id.to_string())
            .await?;

        if removed {
            Ok(())
        } else {
            Err(StoreError::NotFound(order_id))
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
