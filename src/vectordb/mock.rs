use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::embedding::cosine_similarity;
use crate::vectordb::error::check_dimensions;
use crate::vectordb::{ProductHit, ProductIndex, ProductPoint, VectorDbError};

const MOCK_COLLECTION: &str = "mock_products";

/// In-memory product index ranking points by exact cosine similarity.
#[derive(Default)]
pub struct MockProductIndex {
    points: std::sync::RwLock<HashMap<u64, ProductPoint>>,
    fail_searches: AtomicBool,
    searches: AtomicUsize,
}

impl MockProductIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, points: Vec<ProductPoint>) -> Result<(), VectorDbError> {
        check_dimensions(&points)?;
        let products = points.len();
        let mut stored = self
            .points
            .write()
            .map_err(|_| VectorDbError::UpsertFailed {
                collection: MOCK_COLLECTION.to_string(),
                products,
                message: "lock poisoned".to_string(),
            })?;

        for point in points {
            stored.insert(point.point_id(), point);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every subsequent search fail.
    pub fn set_fail_searches(&self, fail: bool) {
        self.fail_searches.store(fail, Ordering::SeqCst);
    }

    /// Number of searches served (including failed ones).
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductIndex for MockProductIndex {
    async fn search(
        &self,
        query: Vec<f32>,
        limit: u64,
        brands: &[String],
    ) -> Result<Vec<ProductHit>, VectorDbError> {
        self.searches.fetch_add(1, Ordering::SeqCst);

        if self.fail_searches.load(Ordering::SeqCst) {
            return Err(VectorDbError::SearchFailed {
                collection: MOCK_COLLECTION.to_string(),
                message: "simulated outage".to_string(),
            });
        }

        let points = self.points.read().map_err(|_| VectorDbError::SearchFailed {
            collection: MOCK_COLLECTION.to_string(),
            message: "lock poisoned".to_string(),
        })?;

        let mut hits: Vec<ProductHit> = points
            .values()
            .filter(|p| brands.is_empty() || brands.iter().any(|b| b == &p.brand))
            .map(|p| ProductHit {
                product_id: p.product_id.clone(),
                brand: p.brand.clone(),
                similarity: cosine_similarity(&query, &p.vector),
            })
            .collect();

        // Product id breaks ties so HashMap order never leaks into results.
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });

        hits.truncate(limit as usize);
        Ok(hits)
    }
}
