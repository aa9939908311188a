use rkyv::{Archive, Deserialize, Serialize};

use crate::hashing::{SIGNATURE_LEN, Signature};

/// One stored message. Entries are never updated once written.
///
/// Persisted as `rkyv` bytes by the file-backed store.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct CacheEntry {
    pub signature: [u8; SIGNATURE_LEN],
    /// Message template, before personalization.
    pub message: String,
    /// Unix milliseconds.
    pub created_at: i64,
}

impl CacheEntry {
    pub fn new(signature: &Signature, message: impl Into<String>) -> Self {
        Self {
            signature: *signature.as_bytes(),
            message: message.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn signature(&self) -> Signature {
        Signature::from_bytes(self.signature)
    }
}
