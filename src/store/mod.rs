// ============================================================================
// Order Storage
// ============================================================================
//
// - backend       KvBackend trait, the only seam to the persistence substrate
// - redis         production backend
// - memory        in-process backend (local runs, tests)
// - order_store   Order repository built on a KvBackend
//
// ============================================================================

mod backend;
mod errors;
mod memory;
mod order_store;
mod redis;

pub use backend::{CasOutcome, KvBackend, SetMode};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryBackend;
pub use order_store::{order_key, ListPage, OrderPage, OrderStore, ORDER_INDEX};
pub use self::redis::{redact_url, RedisBackend};
