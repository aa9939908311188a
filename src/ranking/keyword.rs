//! Keyword-overlap bonus.
//!
//! A transparent heuristic added on top of the re-rank score. Its value can be
//! audited from the keyword set and the product text alone.

use crate::intent::Intent;
use crate::profile::{CustomerProfile, Season};

/// Search terms plus the priority list that doubles their weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordSet {
    terms: Vec<String>,
    priority: Vec<String>,
}

impl KeywordSet {
    /// Builds a set from `terms`, trimmed and deduplicated in order.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.extend(terms);
        set
    }

    /// Activates weighting for terms overlapping `priority`.
    pub fn with_priority<I, S>(mut self, priority: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.priority = priority
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    /// Expanded keywords and concern terms; under weather intent also the
    /// season's weather keywords, with its priority list active.
    pub fn for_request(profile: &CustomerProfile, intent: Intent, season: Season) -> Self {
        let mut set = Self::new(profile.expanded_keywords());
        set.extend(profile.concern_terms());

        if intent.is_weather() {
            set.extend(season.weather_keywords());
            set = set.with_priority(season.priority_keywords());
        }
        set
    }

    fn extend<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in terms {
            let term = term.as_ref().trim();
            if !term.is_empty() && !self.terms.iter().any(|t| t == term) {
                self.terms.push(term.to_string());
            }
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn priority_active(&self) -> bool {
        !self.priority.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn is_priority(&self, term: &str) -> bool {
        self.priority
            .iter()
            .any(|p| p.contains(term) || term.contains(p.as_str()))
    }

    /// Bonus in `[0, 1]` for a product's content and keyword tags.
    ///
    /// A term hits when it occurs in the lowercased corpus, or when its
    /// whitespace-free form occurs in the whitespace-free corpus. Priority
    /// hits weigh 2. The denominator doubles whenever a priority list is active.
    pub fn bonus(&self, content: &str, product_keywords: &[String]) -> f32 {
        if self.terms.is_empty() {
            return 0.0;
        }

        let mut corpus = content.to_lowercase();
        if !product_keywords.is_empty() {
            corpus.push(' ');
            corpus.push_str(
                &product_keywords
                    .iter()
                    .map(|k| k.to_lowercase())
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }
        let corpus_compact = strip_whitespace(&corpus);

        let mut hits = 0.0f32;
        for term in &self.terms {
            let term = term.to_lowercase();
            let compact = strip_whitespace(&term);
            let found = corpus.contains(term.as_str())
                || (!compact.is_empty() && corpus_compact.contains(compact.as_str()));
            if !found {
                continue;
            }
            hits += if self.is_priority(&term) { 2.0 } else { 1.0 };
        }

        let factor = if self.priority_active() { 2.0 } else { 1.0 };
        let max_possible = (self.terms.len() as f32 * factor).max(1.0);
        (hits / max_possible).clamp(0.0, 1.0)
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
