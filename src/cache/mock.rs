use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{CacheError, CacheResult, MemoryMessageStore, MessageStore};
use crate::hashing::Signature;

/// In-memory store with failure switches and call counters.
#[derive(Debug, Default)]
pub struct MockMessageStore {
    inner: MemoryMessageStore,
    fail_lookups: AtomicBool,
    fail_stores: AtomicBool,
    lookups: AtomicUsize,
    stores: AtomicUsize,
}

impl MockMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_stores(&self, fail: bool) {
        self.fail_stores.store(fail, Ordering::SeqCst);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Store attempts, including failed ones.
    pub fn store_count(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryMessageStore {
        &self.inner
    }
}

#[async_trait]
impl MessageStore for MockMessageStore {
    async fn lookup(&self, signature: &Signature) -> CacheResult<Option<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable {
                reason: "simulated lookup failure".to_string(),
            });
        }
        self.inner.lookup(signature).await
    }

    async fn store(&self, signature: &Signature, message: &str) -> CacheResult<()> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        if self.fail_stores.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable {
                reason: "simulated store failure".to_string(),
            });
        }
        self.inner.store(signature, message).await
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
