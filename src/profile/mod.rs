//! Customer profile canonicalization.
//!
//! Raw profiles arrive with loosely-typed list fields (JSON arrays, Postgres
//! array literals, comma-separated strings). [`CustomerProfile::normalized`]
//! maps every tag onto the fixed vocabularies in [`vocab`].

pub mod season;
pub mod vocab;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use season::Season;
pub use vocab::{Term, expand_keywords};

/// A list-valued attribute as it arrives from callers or storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawList {
    List(Vec<String>),
    Text(String),
}

impl Default for RawList {
    fn default() -> Self {
        RawList::List(Vec::new())
    }
}

impl RawList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            RawList::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            RawList::Text(text) => normalize_list(&text),
        }
    }
}

/// Splits `{a,b}` / `a, b` strings into trimmed, unquoted items.
pub fn normalize_list(value: &str) -> Vec<String> {
    let mut s = value.trim();
    if s.starts_with('{') && s.ends_with('}') && s.len() >= 2 {
        s = &s[1..s.len() - 1];
    } else if s.starts_with('[') && s.ends_with(']') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(s) {
            return RawList::List(items).into_vec();
        }
        s = &s[1..s.len() - 1];
    }

    s.split(',')
        .map(|item| item.trim().trim_matches('"').trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Wire form of a customer profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProfile {
    pub customer_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "skin_type")]
    pub skin_types: RawList,
    #[serde(default, alias = "skin_concerns")]
    pub concerns: RawList,
    #[serde(default, alias = "preferred_tone")]
    pub tone: Option<RawList>,
    #[serde(default)]
    pub keywords: RawList,
}

/// A canonicalized customer profile. Immutable for the duration of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: String,
    /// Display name used only for personalization.
    pub name: Option<String>,
    pub skin_types: Vec<String>,
    pub concerns: Vec<String>,
    pub tone: Option<String>,
    pub keywords: Vec<String>,
}

impl From<RawProfile> for CustomerProfile {
    fn from(raw: RawProfile) -> Self {
        // Tone is sometimes stored as a one-element array.
        let tone = raw.tone.and_then(|t| t.into_vec().into_iter().next());
        Self {
            customer_id: raw.customer_id.trim().to_string(),
            name: raw
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            skin_types: raw.skin_types.into_vec(),
            concerns: raw.concerns.into_vec(),
            tone,
            keywords: raw.keywords.into_vec(),
        }
        .normalized()
    }
}

impl CustomerProfile {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn skin_types<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skin_types = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn concerns<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.concerns = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    pub fn keywords<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Maps tags onto canonical vocabulary terms and drops duplicates.
    ///
    /// Keywords are free-form: they are trimmed and deduplicated, never renamed.
    pub fn normalized(self) -> Self {
        fn canonicalize(tags: Vec<String>, resolve: fn(&str) -> Option<Term>) -> Vec<String> {
            let mut out: Vec<String> = Vec::with_capacity(tags.len());
            for tag in tags {
                let tag = tag.trim();
                if tag.is_empty() {
                    continue;
                }
                let canonical = resolve(tag)
                    .map(|t| t.canonical.to_string())
                    .unwrap_or_else(|| tag.to_string());
                if !out.contains(&canonical) {
                    out.push(canonical);
                }
            }
            out
        }

        let tone = self
            .tone
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(|t| vocab::tone(&t).map(|v| v.canonical.to_string()).unwrap_or(t));

        Self {
            customer_id: self.customer_id,
            name: self.name,
            skin_types: canonicalize(self.skin_types, vocab::skin_type),
            concerns: canonicalize(self.concerns, vocab::concern),
            tone,
            keywords: canonicalize(self.keywords, |_| None),
        }
    }

    /// Korean display terms for skin types.
    pub fn skin_type_terms(&self) -> Vec<String> {
        display_terms(&self.skin_types, vocab::skin_type)
    }

    /// Korean display terms for concerns.
    pub fn concern_terms(&self) -> Vec<String> {
        display_terms(&self.concerns, vocab::concern)
    }

    pub fn tone_term(&self) -> Option<String> {
        self.tone.as_deref().map(|t| {
            vocab::tone(t)
                .map(|v| v.display.to_string())
                .unwrap_or_else(|| t.to_string())
        })
    }

    /// Keywords followed by their translated variants.
    pub fn expanded_keywords(&self) -> Vec<String> {
        expand_keywords(&self.keywords)
    }
}

fn display_terms(tags: &[String], resolve: fn(&str) -> Option<Term>) -> Vec<String> {
    tags.iter()
        .map(|tag| {
            resolve(tag)
                .map(|t| t.display.to_string())
                .unwrap_or_else(|| tag.clone())
        })
        .collect()
}
