//! Product vector index (Qdrant).

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{ProductIndex, QdrantProductIndex};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockProductIndex;
pub use model::{ProductHit, ProductPoint, point_id_for};
