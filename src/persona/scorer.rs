use std::sync::Arc;

use tracing::debug;

use super::PersonaCatalog;
use crate::constants::PERSONA_BRAND_WEIGHT;

/// How a brand set was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandSource {
    /// Caller supplied a brand explicitly.
    Override,
    /// Persona affinity plus interaction counts.
    Scored,
    /// Nothing to score; configured default.
    Default,
}

/// Set of acceptable brands for a request. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandResolution {
    pub brands: Vec<String>,
    pub source: BrandSource,
    /// Winning score (`0` for override and default).
    pub score: u32,
}

impl BrandResolution {
    /// First brand in the set, used where a single voice is needed.
    pub fn primary(&self) -> &str {
        self.brands.first().map(String::as_str).unwrap_or_default()
    }
}

/// Scores brands by persona affinity and recent interactions.
#[derive(Debug, Clone)]
pub struct BrandScorer {
    catalog: Arc<PersonaCatalog>,
    default_brand: String,
}

impl BrandScorer {
    pub fn new(catalog: Arc<PersonaCatalog>, default_brand: impl Into<String>) -> Self {
        Self {
            catalog,
            default_brand: default_brand.into(),
        }
    }

    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    pub fn default_brand(&self) -> &str {
        &self.default_brand
    }

    /// Returns every brand tied at the maximum score.
    ///
    /// `score(b) = 3 * [b recommended by persona] + count(b in interactions)`.
    /// Ties keep first-seen order: persona brands, then interactions.
    pub fn resolve(
        &self,
        persona_id: Option<&str>,
        interactions: &[String],
        brand_override: Option<&str>,
    ) -> BrandResolution {
        if let Some(brand) = brand_override.map(str::trim).filter(|b| !b.is_empty()) {
            debug!(brand, "brand override supplied, skipping scoring");
            return BrandResolution {
                brands: vec![brand.to_string()],
                source: BrandSource::Override,
                score: 0,
            };
        }

        let recommended: &[String] = persona_id
            .and_then(|id| self.catalog.persona(id))
            .map(|p| p.recommended_brands.as_slice())
            .unwrap_or_default();

        let mut scores: Vec<(String, u32)> = Vec::new();
        let mut bump = |brand: &str, by: u32| {
            let brand = brand.trim();
            if brand.is_empty() {
                return;
            }
            match scores.iter_mut().find(|(b, _)| b == brand) {
                Some((_, score)) => *score += by,
                None => scores.push((brand.to_string(), by)),
            }
        };

        for brand in recommended {
            // A persona listing a brand twice still earns the affinity once.
            bump(brand, 0);
        }
        for brand in interactions {
            bump(brand, 1);
        }

        for (brand, score) in scores.iter_mut() {
            if recommended.iter().any(|r| r.trim() == brand.as_str()) {
                *score += PERSONA_BRAND_WEIGHT;
            }
        }

        let best = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
        if best == 0 {
            debug!(
                persona = persona_id.unwrap_or(""),
                default = %self.default_brand,
                "no persona or interaction data, using default brand"
            );
            return BrandResolution {
                brands: vec![self.default_brand.clone()],
                source: BrandSource::Default,
                score: 0,
            };
        }

        let brands: Vec<String> = scores
            .into_iter()
            .filter(|(_, s)| *s == best)
            .map(|(b, _)| b)
            .collect();

        debug!(?brands, score = best, "brands resolved");

        BrandResolution {
            brands,
            source: BrandSource::Scored,
            score: best,
        }
    }
}
