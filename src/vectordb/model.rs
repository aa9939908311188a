use qdrant_client::qdrant::ScoredPoint;

use crate::hashing::hash_parts_to_u64;

/// A product vector with the payload fields the index filters on.
#[derive(Debug, Clone)]
pub struct ProductPoint {
    pub product_id: String,
    pub brand: String,
    pub vector: Vec<f32>,
}

impl ProductPoint {
    pub fn new(product_id: impl Into<String>, brand: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            product_id: product_id.into(),
            brand: brand.into(),
            vector,
        }
    }

    /// Numeric point id derived from the product id.
    pub fn point_id(&self) -> u64 {
        point_id_for(&self.product_id)
    }
}

/// One coarse retrieval result.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductHit {
    pub product_id: String,
    pub brand: String,
    pub similarity: f32,
}

impl ProductHit {
    /// Reads `product_id` and `brand` from the payload. Points without a product id are skipped.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let payload = point.payload;

        let product_id = payload
            .get("product_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())?;

        let brand = payload
            .get("brand")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default();

        Some(ProductHit {
            product_id,
            brand,
            similarity: point.score,
        })
    }
}

pub fn point_id_for(product_id: &str) -> u64 {
    hash_parts_to_u64(&[product_id])
}
