use thiserror::Error;

/// Product index failures.
#[derive(Debug, Error)]
pub enum VectorDbError {
    #[error("product index at '{url}' unreachable: {message}")]
    ConnectionFailed { url: String, message: String },

    #[error("could not create product collection '{collection}': {message}")]
    CreateCollectionFailed { collection: String, message: String },

    #[error("could not index {products} products into '{collection}': {message}")]
    UpsertFailed {
        collection: String,
        products: usize,
        message: String,
    },

    #[error("product search in '{collection}' failed: {message}")]
    SearchFailed { collection: String, message: String },

    /// Every point in one upsert must share a width.
    #[error("product '{product_id}' has a {actual}-dim vector, expected {expected}")]
    DimensionMismatch {
        product_id: String,
        expected: usize,
        actual: usize,
    },
}

/// Checks that all `points` share the first point's vector width.
pub(crate) fn check_dimensions(points: &[super::ProductPoint]) -> Result<(), VectorDbError> {
    let Some(expected) = points.first().map(|p| p.vector.len()) else {
        return Ok(());
    };
    match points.iter().find(|p| p.vector.len() != expected) {
        Some(p) => Err(VectorDbError::DimensionMismatch {
            product_id: p.product_id.clone(),
            expected,
            actual: p.vector.len(),
        }),
        None => Ok(()),
    }
}
