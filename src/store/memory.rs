use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::backend::{CasOutcome, KvBackend, SetMode};
use super::errors::StoreResult;

/// In-process backend with the same semantics as the Redis one.
///
/// Used for local runs without a Redis server and by the test suite.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, String>,
    indexes: HashMap<String, Vec<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, mode: SetMode) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let exists = inner.records.contains_key(key);

        let write = match mode {
            SetMode::Always => true,
            SetMode::IfAbsent => !exists,
            SetMode::IfPresent => exists,
        };
        if write {
            inner.records.insert(key.to_string(), value.to_string());
        }

        Ok(write)
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: &str,
        value: &str,
    ) -> StoreResult<CasOutcome> {
        let mut inner = self.inner.write().await;

        match inner.records.get_mut(key) {
            None => Ok(CasOutcome::Missing),
            Some(current) if current.as_str() != expected => Ok(CasOutcome::Mismatch),
            Some(current) => {
                *current = value.to_string();
                Ok(CasOutcome::Swapped)
            }
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.records.remove(key).is_some())
    }

    async fn index_add(&self, index: &str, member: &str) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let members = inner.indexes.entry(index.to_string()).or_default();

        if !members.iter().any(|m| m == member) {
            members.push(member.to_string());
        }

        Ok(())
    }

    async fn index_range(
        &self,
        index: &str,
        offset: u64,
        count: u64,
    ) -> StoreResult<Vec<String>> {
        let inner = self.inner.read().await;
        let Some(members) = inner.indexes.get(index) else {
            return Ok(Vec::new());
        };

        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        let count = usize::try_from(count).unwrap_or(usize::MAX);

        Ok(members.iter().skip(start).take(count).cloned().collect())
    }

    async fn delete_indexed(&self, key: &str, index: &str, member: &str) -> StoreResult<bool> {
        // Single write guard covers both removals
        let mut inner = self.inner.write().await;

        let existed = inner.records.remove(key).is_some();
        if let Some(members) = inner.indexes.get_mut(index) {
            members.retain(|m| m != member);
        }

        Ok(existed)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_modes() {
        let backend = MemoryBackend::new();

        assert!(!backend.set("k", "a", SetMode::IfPresent).await.unwrap());
        assert!(backend.set("k", "a", SetMode::IfAbsent).await.unwrap());
        assert!(!backend.set("k", "b", SetMode::IfAbsent).await.unwrap());
        assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("a"));

        assert!(backend.set("k", "c", SetMode::IfPresent).await.unwrap());
        assert!(backend.set("k", "d", SetMode::Always).await.unwrap());
        assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("d"));
    }

    #[tokio::test]
    async fn test_compare_and_set() {
        let backend = MemoryBackend::new();

        assert_eq!(backend.compare_and_set("k", "a", "b").await.unwrap(), CasOutcome::Missing);

        backend.set("k", "a", SetMode::Always).await.unwrap();
        assert_eq!(backend.compare_and_set("k", "x", "b").await.unwrap(), CasOutcome::Mismatch);
        assert_eq!(backend.compare_and_set("k", "a", "b").await.unwrap(), CasOutcome::Swapped);
        assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_index_keeps_insertion_order() {
        let backend = MemoryBackend::new();
        for member in ["30", "10", "20", "10"] {
            backend.index_add("idx", member).await.unwrap();
        }

        assert_eq!(backend.index_range("idx", 0, 10).await.unwrap(), vec!["30", "10", "20"]);
        assert_eq!(backend.index_range("idx", 1, 1).await.unwrap(), vec!["10"]);
        assert!(backend.index_range("idx", 3, 5).await.unwrap().is_empty());
        assert!(backend.index_range("missing", 0, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_indexed_removes_both() {
        let backend = MemoryBackend::new();
        backend.set("rec:1", "v", SetMode::Always).await.unwrap();
        backend.index_add("idx", "1").await.unwrap();

        assert!(backend.delete_indexed("rec:1", "idx", "1").await.unwrap());
        assert!(backend.get("rec:1").await.unwrap().is_none());
        assert!(backend.index_range("idx", 0, 10).await.unwrap().is_empty());

        assert!(!backend.delete_indexed("rec:1", "idx", "1").await.unwrap());
    }
}
