use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{CacheEntry, CacheResult, MessageStore};
use crate::hashing::Signature;

/// Append-only in-process store.
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    entries: RwLock<HashMap<Signature, Vec<CacheEntry>>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry stored under `signature`, oldest first.
    pub fn entries(&self, signature: &Signature) -> Vec<CacheEntry> {
        self.entries
            .read()
            .get(signature)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn lookup(&self, signature: &Signature) -> CacheResult<Option<String>> {
        Ok(self
            .entries
            .read()
            .get(signature)
            .and_then(|entries| entries.first())
            .map(|entry| entry.message.clone()))
    }

    async fn store(&self, signature: &Signature, message: &str) -> CacheResult<()> {
        self.entries
            .write()
            .entry(*signature)
            .or_default()
            .push(CacheEntry::new(signature, message));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
