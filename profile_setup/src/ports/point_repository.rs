use async_trait::async_trait;
use common::helper::error_chain_fmt;

use crate::domain::entities::point::{Embeddings, Point, SimilarPoint};

/// Outcome of a collection creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionCreation {
    Created,
    AlreadyExists,
}

/// Collections of points in a vector database.
///
/// Collections are created with a cosine distance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PointRepository: Send + Sync {
    /// Creates the collection, not failing if it already exists
    async fn create_collection(
        &self,
        collection_name: &str,
        vector_size: u64,
    ) -> Result<CollectionCreation, PointRepositoryError>;

    /// Upserts all the points in one request: a point with an existing id is overwritten
    async fn batch_save(
        &self,
        collection_name: &str,
        points: Vec<Point>,
    ) -> Result<(), PointRepositoryError>;

    async fn count_points(&self, collection_name: &str) -> Result<u64, PointRepositoryError>;

    /// Returns at most `limit` points, the most similar first, with their payload
    async fn search(
        &self,
        collection_name: &str,
        vector: Embeddings,
        limit: u64,
    ) -> Result<Vec<SimilarPoint>, PointRepositoryError>;
}

#[derive(thiserror::Error)]
pub enum PointRepositoryError {
    #[error("Error from Qdrant: {0}")]
    QdrantError(String),

    #[error("Collection {0} not found")]
    CollectionNotFound(String),

    #[error("Invalid point: {0}")]
    InvalidPoint(String),
}

impl std::fmt::Debug for PointRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
