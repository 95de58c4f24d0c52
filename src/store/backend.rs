use async_trait::async_trait;

use super::errors::StoreResult;

// ============================================================================
// Key-Value Backend
// ============================================================================
//
// The narrow surface the order store needs from its persistence substrate:
// flat string records plus an insertion-ordered membership index.
// Implementations are shared across requests behind an Arc.
//
// ============================================================================

/// Write condition for [`KvBackend::set`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    Always,
    IfAbsent,
    IfPresent,
}

/// Outcome of [`KvBackend::compare_and_set`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    Swapped,
    Mismatch,
    Missing,
}

#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Liveness check
    async fn ping(&self) -> StoreResult<()>;

    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Returns whether the value was written
    async fn set(&self, key: &str, value: &str, mode: SetMode) -> StoreResult<bool>;

    /// Replace `key` only if it currently holds exactly `expected`
    async fn compare_and_set(&self, key: &str, expected: &str, value: &str)
        -> StoreResult<CasOutcome>;

    /// Returns whether the key existed
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Append `member` to the end of `index`. Existing members keep their position.
    async fn index_add(&self, index: &str, member: &str) -> StoreResult<()>;

    /// Up to `count` members starting at zero-based position `offset`
    async fn index_range(&self, index: &str, offset: u64, count: u64)
        -> StoreResult<Vec<String>>;

    /// Remove the record and its index entry together; returns whether the
    /// record existed
    async fn delete_indexed(&self, key: &str, index: &str, member: &str) -> StoreResult<bool>;

    fn backend_name(&self) -> &'static str;
}
