//! File-backed store: one `rkyv` file per entry under a per-signature directory.
//!
//! Layout: `<root>/<signature hex>/<millis>-<sequence>-<uuid>.rkyv`. File names
//! sort in insertion order, so the first readable name is the first match. A
//! new name never sorts before the newest existing one, even after a restart
//! or a backwards clock step. Writes go to a temp file and are renamed into
//! place.

use async_trait::async_trait;
use rkyv::rancor::Error as RkyvError;
use rkyv::util::AlignedVec;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

use super::{CacheEntry, CacheError, CacheResult, MessageStore};
use crate::hashing::Signature;

const RKYV_EXTENSION: &str = "rkyv";
const TEMP_EXTENSION: &str = "rkyv.tmp";

#[derive(Debug)]
pub struct FileMessageStore {
    root: PathBuf,
    sequence: Arc<AtomicU64>,
}

impl FileMessageStore {
    /// Creates the store, creating `root` if needed.
    pub fn open(root: impl Into<PathBuf>) -> CacheResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| CacheError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self {
            root,
            sequence: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn signature_dir(&self, signature: &Signature) -> PathBuf {
        self.root.join(signature.to_hex())
    }

    /// Entry file paths for `signature`, oldest first.
    pub fn entry_paths(&self, signature: &Signature) -> CacheResult<Vec<PathBuf>> {
        list_entries(&self.signature_dir(signature))
    }
}

fn list_entries(dir: &Path) -> CacheResult<Vec<PathBuf>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(CacheError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut paths: Vec<PathBuf> = read_dir
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(RKYV_EXTENSION))
        .collect();
    paths.sort();
    Ok(paths)
}

/// `(millis, sequence)` encoded in an entry file name.
fn parse_entry_name(path: &Path) -> Option<(i64, u64)> {
    let stem = path.file_stem()?.to_str()?;
    let mut parts = stem.splitn(3, '-');
    let millis = parts.next()?.parse().ok()?;
    let seq = parts.next()?.parse().ok()?;
    Some((millis, seq))
}

/// Name for a new entry in `dir` that sorts after every existing entry.
fn next_entry_name(dir: &Path, created_at: i64, sequence: &AtomicU64) -> CacheResult<String> {
    let mut millis = created_at.max(0);
    let last = list_entries(dir)?.last().and_then(|p| parse_entry_name(p));
    if let Some((last_millis, last_seq)) = last
        && last_millis >= millis
    {
        millis = last_millis;
        sequence.fetch_max(last_seq + 1, Ordering::Relaxed);
    }
    let seq = sequence.fetch_add(1, Ordering::Relaxed);

    Ok(format!(
        "{:016}-{:010}-{}",
        millis,
        seq,
        uuid::Uuid::new_v4().simple()
    ))
}

fn read_entry(path: &Path) -> CacheResult<CacheEntry> {
    let bytes = fs::read(path).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
    aligned.extend_from_slice(&bytes);

    rkyv::from_bytes::<CacheEntry, RkyvError>(&aligned).map_err(|e| CacheError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn write_entry(dir: &Path, entry: &CacheEntry, sequence: &AtomicU64) -> CacheResult<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| CacheError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let name = next_entry_name(dir, entry.created_at, sequence)?;

    let bytes = rkyv::to_bytes::<RkyvError>(entry).map_err(|e| CacheError::Serialization {
        reason: e.to_string(),
    })?;

    let temp_path = dir.join(format!("{name}.{TEMP_EXTENSION}"));
    let final_path = dir.join(format!("{name}.{RKYV_EXTENSION}"));
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| CacheError::Io { path, source }
    };

    {
        let mut file = File::create(&temp_path).map_err(io_err(&temp_path))?;
        file.write_all(&bytes).map_err(io_err(&temp_path))?;
        file.sync_all().map_err(io_err(&temp_path))?;
    }
    fs::rename(&temp_path, &final_path).map_err(io_err(&final_path))?;

    Ok(final_path)
}

#[async_trait]
impl MessageStore for FileMessageStore {
    async fn lookup(&self, signature: &Signature) -> CacheResult<Option<String>> {
        let dir = self.signature_dir(signature);

        tokio::task::spawn_blocking(move || {
            for path in list_entries(&dir)? {
                match read_entry(&path) {
                    Ok(entry) => return Ok(Some(entry.message)),
                    Err(e @ CacheError::Corrupt { .. }) => {
                        warn!(error = %e, "skipping unreadable cache entry");
                    }
                    Err(e) => return Err(e),
                }
            }
            Ok(None)
        })
        .await
        .map_err(|e| CacheError::Task {
            reason: e.to_string(),
        })?
    }

    async fn store(&self, signature: &Signature, message: &str) -> CacheResult<()> {
        let dir = self.signature_dir(signature);
        let entry = CacheEntry::new(signature, message);
        let sequence = Arc::clone(&self.sequence);

        let path = tokio::task::spawn_blocking(move || write_entry(&dir, &entry, &sequence))
            .await
            .map_err(|e| CacheError::Task {
                reason: e.to_string(),
            })??;

        debug!(path = %path.display(), "stored cache entry");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
