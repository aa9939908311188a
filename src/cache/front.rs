use async_trait::async_trait;
use moka::sync::Cache;
use std::sync::Arc;

use super::{CacheResult, MessageStore};
use crate::hashing::Signature;

/// Memoizes first matches in front of another store.
///
/// The first match for a signature never changes once it exists, so a
/// memoized hit is never stale. Misses are not memoized.
pub struct CachedMessageStore {
    front: Cache<Signature, String>,
    inner: Arc<dyn MessageStore>,
}

impl std::fmt::Debug for CachedMessageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedMessageStore")
            .field("inner", &self.inner.name())
            .field("front_entries", &self.front.entry_count())
            .finish()
    }
}

impl CachedMessageStore {
    pub const DEFAULT_CAPACITY: u64 = 10_000;

    pub fn new(inner: Arc<dyn MessageStore>) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    /// Bounded front cache with LRU-style eviction.
    pub fn with_capacity(inner: Arc<dyn MessageStore>, capacity: u64) -> Self {
        Self {
            front: Cache::builder().max_capacity(capacity).build(),
            inner,
        }
    }

    pub fn front_len(&self) -> u64 {
        self.front.run_pending_tasks();
        self.front.entry_count()
    }
}

#[async_trait]
impl MessageStore for CachedMessageStore {
    async fn lookup(&self, signature: &Signature) -> CacheResult<Option<String>> {
        if let Some(message) = self.front.get(signature) {
            return Ok(Some(message));
        }

        let found = self.inner.lookup(signature).await?;
        if let Some(message) = &found {
            self.front.insert(*signature, message.clone());
        }
        Ok(found)
    }

    async fn store(&self, signature: &Signature, message: &str) -> CacheResult<()> {
        self.inner.store(signature, message).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
