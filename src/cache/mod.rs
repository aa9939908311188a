//! Content-addressed message cache.
//!
//! Entries are keyed by [`Signature`] and only ever appended. A lookup returns
//! the earliest entry for its signature. There is no invalidation; callers
//! bypass the cache per request instead.

pub mod entry;
pub mod error;
pub mod file;
pub mod front;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use entry::{ArchivedCacheEntry, CacheEntry};
pub use error::{CacheError, CacheResult};
pub use file::FileMessageStore;
pub use front::CachedMessageStore;
pub use memory::MemoryMessageStore;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockMessageStore;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::hashing::Signature;

/// Append-only message storage.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// First message stored under `signature`, if any.
    async fn lookup(&self, signature: &Signature) -> CacheResult<Option<String>>;

    /// Appends `message` under `signature`. Never overwrites.
    async fn store(&self, signature: &Signature, message: &str) -> CacheResult<()>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// File-backed store under `path` when set, in-memory otherwise, behind a
/// front cache of `capacity` entries.
pub fn build_message_store(path: Option<PathBuf>, capacity: u64) -> CacheResult<Arc<dyn MessageStore>> {
    let inner: Arc<dyn MessageStore> = match path {
        Some(path) => {
            info!(path = %path.display(), "using file-backed message cache");
            Arc::new(FileMessageStore::open(path)?)
        }
        None => {
            info!("no cache path configured, using in-memory message cache");
            Arc::new(MemoryMessageStore::new())
        }
    };

    Ok(Arc::new(CachedMessageStore::with_capacity(inner, capacity)))
}
