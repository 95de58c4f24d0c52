use crate::utils::IsTransient;

// ============================================================================
// Order Store Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    NotFound(u64),

    #[error("Order already exists: {0}")]
    AlreadyExists(u64),

    #[error("Order {0} was modified concurrently")]
    Conflict(u64),

    #[error("Page size must be positive")]
    InvalidPage,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Backend operation timed out: {0}")]
    Timeout(&'static str),

    #[error("Malformed order record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Backend unreachable, timed out, or returned data that does not decode.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            StoreError::Backend(_) | StoreError::Timeout(_) | StoreError::Serialization(_)
        )
    }
}

impl IsTransient for StoreError {
    fn is_transient(&self) -> bool {
        matches!(self, StoreError::Backend(_) | StoreError::Timeout(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
