use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

use super::error::{VectorDbError, check_dimensions};
use super::model::{ProductHit, ProductPoint};

/// Coarse similarity search over product embeddings.
#[async_trait]
pub trait ProductIndex: Send + Sync {
    /// Returns up to `limit` hits ordered by similarity descending.
    ///
    /// A non-empty `brands` restricts hits to those brands.
    async fn search(
        &self,
        query: Vec<f32>,
        limit: u64,
        brands: &[String],
    ) -> Result<Vec<ProductHit>, VectorDbError>;

    async fn is_ready(&self) -> bool {
        true
    }
}

/// Product index backed by a Qdrant collection.
#[derive(Clone)]
pub struct QdrantProductIndex {
    client: Qdrant,
    url: String,
    collection: String,
}

impl std::fmt::Debug for QdrantProductIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantProductIndex")
            .field("url", &self.url)
            .field("collection", &self.collection)
            .finish()
    }
}

impl QdrantProductIndex {
    /// Creates a client for `url`. Does not contact the server.
    pub fn new(url: &str, collection: impl Into<String>) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Creates the collection with cosine distance if it does not exist.
    pub async fn ensure_collection(&self, vector_size: u64) -> Result<(), VectorDbError> {
        let exists = self
            .client
            .collection_exists(self.collection.as_str())
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        if exists {
            debug!(collection = %self.collection, "collection already exists");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine)),
            )
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        info!(collection = %self.collection, vector_size, "created product collection");
        Ok(())
    }

    /// Upserts product vectors with `product_id` and `brand` payload.
    pub async fn upsert_products(&self, points: Vec<ProductPoint>) -> Result<(), VectorDbError> {
        if points.is_empty() {
            return Ok(());
        }
        check_dimensions(&points)?;
        let products = points.len();

        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| {
                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert("product_id".to_string(), p.product_id.clone().into());
                payload.insert("brand".to_string(), p.brand.clone().into());
                PointStruct::new(p.point_id(), p.vector, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, qdrant_points).wait(true))
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: self.collection.clone(),
                products,
                message: e.to_string(),
            })?;

        info!(collection = %self.collection, products, "indexed products");
        Ok(())
    }
}

#[async_trait]
impl ProductIndex for QdrantProductIndex {
    #[instrument(skip(self, query, brands), fields(collection = %self.collection, brands = brands.len()))]
    async fn search(
        &self,
        query: Vec<f32>,
        limit: u64,
        brands: &[String],
    ) -> Result<Vec<ProductHit>, VectorDbError> {
        let mut search_builder =
            SearchPointsBuilder::new(&self.collection, query, limit).with_payload(true);

        if !brands.is_empty() {
            let filter = Filter::must([Condition::matches("brand", brands.to_vec())]);
            search_builder = search_builder.filter(filter);
        }

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        let hits = search_result
            .result
            .into_iter()
            .filter_map(ProductHit::from_scored_point)
            .collect();

        Ok(hits)
    }

    async fn is_ready(&self) -> bool {
        self.health_check().await.is_ok()
    }
}
