//! Pre-approved messages used when every draft is rejected.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use super::{ComplianceError, ComplianceResult};
use crate::channel::Channel;
use crate::hashing::{Signature, hash_parts_to_u64};

/// One group of vetted templates. `brand` or `channel` left empty matches any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackSet {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub channel: Option<Channel>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Key {
    brand: Option<String>,
    channel: Option<Channel>,
}

/// Fallback templates keyed by brand and channel.
///
/// Lookup prefers an exact brand and channel match, then brand only, then
/// channel only, then the catch-all set. Selection within a set is a pure
/// function of brand, channel and signature.
#[derive(Debug, Clone)]
pub struct FallbackCatalog {
    sets: HashMap<Key, Vec<String>>,
}

const GENERIC_MESSAGE: &str = "[{brand}] {{customer_name}}님, 오늘도 피부를 위한 작은 휴식을 선물하세요.\n\
{{customer_name}}님께 어울리는 데일리 케어 제품을 확인해 보세요.";

impl FallbackCatalog {
    pub fn new(sets: Vec<FallbackSet>) -> Self {
        let mut by_key: HashMap<Key, Vec<String>> = HashMap::new();
        for set in sets {
            let key = Key {
                brand: set
                    .brand
                    .map(|b| b.trim().to_lowercase())
                    .filter(|b| !b.is_empty()),
                channel: set.channel,
            };
            by_key
                .entry(key)
                .or_default()
                .extend(set.messages.into_iter().filter(|m| !m.trim().is_empty()));
        }
        by_key.retain(|_, messages| !messages.is_empty());
        Self { sets: by_key }
    }

    pub fn from_path(path: &Path) -> ComplianceResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ComplianceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let sets: Vec<FallbackSet> =
            serde_json::from_str(&raw).map_err(|source| ComplianceError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), sets = sets.len(), "loaded fallback messages");
        Ok(Self::new(sets))
    }

    pub fn builtin() -> Self {
        fn set(brand: Option<&str>, channel: Option<Channel>, messages: &[&str]) -> FallbackSet {
            FallbackSet {
                brand: brand.map(str::to_string),
                channel,
                messages: messages.iter().map(|m| m.to_string()).collect(),
            }
        }

        Self::new(vec![
            set(
                Some("Laneige"),
                None,
                &[
                    "[라네즈] {{customer_name}}님, 수분 가득한 하루를 시작해 보세요.\n촉촉한 피부를 위한 라네즈의 수분 케어를 만나보세요.",
                    "[라네즈] {{customer_name}}님을 위한 수분 루틴 제안\n가볍고 산뜻한 보습으로 피부에 생기를 더해 보세요.",
                ],
            ),
            set(
                Some("Sulwhasoo"),
                None,
                &[
                    "[설화수] {{customer_name}}님, 피부 본연의 균형을 가꾸는 시간\n설화수의 퍼스트 케어로 하루를 채워 보세요.",
                ],
            ),
            set(
                Some("Innisfree"),
                None,
                &[
                    "[이니스프리] {{customer_name}}님, 제주의 자연을 담은 케어\n순한 성분으로 피부에 편안함을 더해 보세요.",
                ],
            ),
            set(
                None,
                Some(Channel::Sms),
                &[
                    "[{brand}] {{customer_name}}님께 어울리는 제품을 준비했어요.\n자세한 내용은 링크에서 확인해 주세요.",
                ],
            ),
            set(None, None, &[GENERIC_MESSAGE]),
        ])
    }

    /// Picks a template for `brand` and `channel`. `{brand}` in the template is
    /// filled in; `{{customer_name}}` is left for personalization.
    pub fn select(&self, brand: &str, channel: Channel, signature: &Signature) -> String {
        let brand_key = brand.trim().to_lowercase();
        let candidates = [
            Key {
                brand: Some(brand_key.clone()),
                channel: Some(channel),
            },
            Key {
                brand: Some(brand_key),
                channel: None,
            },
            Key {
                brand: None,
                channel: Some(channel),
            },
            Key {
                brand: None,
                channel: None,
            },
        ];

        let messages = candidates.iter().find_map(|key| self.sets.get(key));
        let template = match messages {
            Some(messages) => {
                let hex = signature.to_hex();
                let index =
                    hash_parts_to_u64(&[brand, channel.as_str(), &hex]) % messages.len() as u64;
                messages[index as usize].as_str()
            }
            None => GENERIC_MESSAGE,
        };

        template.replace("{brand}", brand)
    }

    pub fn len(&self) -> usize {
        self.sets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
