use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised by product catalog operations.
pub enum CatalogError {
    #[error("failed to read product catalog '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse product catalog '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate product id '{id}'")]
    DuplicateProduct { id: String },

    /// Backing store could not serve the request.
    #[error("product catalog unavailable: {message}")]
    Unavailable { message: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
