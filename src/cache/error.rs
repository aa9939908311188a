use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Message store failures. Callers treat them as misses or skipped writes.
pub enum CacheError {
    #[error("cache I/O failed at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize cache entry: {reason}")]
    Serialization { reason: String },

    #[error("corrupt cache entry '{path}': {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("cache task failed: {reason}")]
    Task { reason: String },

    #[error("cache store unavailable: {reason}")]
    Unavailable { reason: String },
}

pub type CacheResult<T> = Result<T, CacheError>;
