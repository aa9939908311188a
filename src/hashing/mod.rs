//! Content-addressed signatures for generation contexts.
//!
//! A [`Signature`] is the BLAKE3 hash of a canonical rendering of everything
//! that shapes a generated message. List-valued profile fields are sorted
//! before rendering, so arrival order never changes the signature. Changing
//! [`canonical_context`] orphans every stored cache entry.

#[cfg(test)]
mod tests;

use blake3::Hasher;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::channel::Channel;
use crate::intent::Intent;
use crate::profile::CustomerProfile;

pub const SIGNATURE_LEN: usize = 32;

/// 256-bit cache signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature([u8; SIGNATURE_LEN]);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid signature '{value}': expected {expected} hex characters", expected = SIGNATURE_LEN * 2)]
pub struct SignatureParseError {
    pub value: String,
}

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        blake3::Hash::from_bytes(self.0).to_hex().to_string()
    }

    /// First 8 bytes as a little-endian integer.
    pub fn to_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl FromStr for Signature {
    type Err = SignatureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        blake3::Hash::from_hex(s.trim())
            .map(|h| Self(*h.as_bytes()))
            .map_err(|_| SignatureParseError {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", &self.to_hex()[..16])
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Fields that identify a reusable generation context.
#[derive(Debug, Clone, Copy)]
pub struct SignatureInput<'a> {
    pub brand: &'a str,
    pub persona: &'a str,
    pub intent: Intent,
    /// Ignored unless `intent` is [`Intent::Weather`].
    pub weather: &'a str,
    pub product_name: &'a str,
    pub channel: Channel,
    pub profile: &'a CustomerProfile,
}

/// Escapes the separator characters used by the canonical rendering.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.trim().chars() {
        if matches!(c, '\\' | '|' | ',' | ';' | '=') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn sorted_list(items: &[String]) -> String {
    let mut items: Vec<String> = items.iter().map(|s| escape(s)).collect();
    items.sort();
    items.join(",")
}

/// `skin=..;concerns=..;keywords=..;tone=..` with every list sorted.
///
/// Customer id and display name are not part of the rendering.
pub fn canonical_profile(profile: &CustomerProfile) -> String {
    format!(
        "skin={};concerns={};keywords={};tone={}",
        sorted_list(&profile.skin_types),
        sorted_list(&profile.concerns),
        sorted_list(&profile.keywords),
        escape(profile.tone.as_deref().unwrap_or_default()),
    )
}

/// Full canonical rendering hashed by [`signature`].
pub fn canonical_context(input: &SignatureInput<'_>) -> String {
    let weather = if input.intent.is_weather() {
        input.weather
    } else {
        ""
    };

    [
        escape(input.brand),
        escape(input.persona),
        input.intent.as_str().to_string(),
        escape(weather),
        escape(input.product_name),
        input.channel.as_str().to_string(),
        canonical_profile(input.profile),
    ]
    .join("|")
}

pub fn signature(input: &SignatureInput<'_>) -> Signature {
    let mut hasher = Hasher::new();
    hasher.update(canonical_context(input).as_bytes());
    Signature(*hasher.finalize().as_bytes())
}

/// 64-bit BLAKE3 digest of `parts` joined by `|`.
///
/// Used for deterministic selection, never for identity.
pub fn hash_parts_to_u64(parts: &[&str]) -> u64 {
    let mut hasher = Hasher::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        hasher.update(part.as_bytes());
    }
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
