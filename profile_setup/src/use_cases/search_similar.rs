use common::helper::error_chain_fmt;
use tracing::info;

use crate::{
    domain::entities::{
        collection_name::{collection_name, CollectionKind, UserId},
        point::SimilarPoint,
    },
    ports::{
        embeddings_service::EmbeddingsService,
        point_repository::{PointRepository, PointRepositoryError},
    },
    use_cases::embed_text::{self, EmbedTextError},
};

pub const DEFAULT_SEARCH_LIMIT: u64 = 3;

/// Finds the points of a user collection the most similar to a query text
///
/// Returns at most `limit` points, the most similar first.
#[tracing::instrument(name = "Searching similar points", skip(point_repository, embeddings_service))]
pub async fn execute(
    point_repository: &dyn PointRepository,
    embeddings_service: &dyn EmbeddingsService,
    user_id: &UserId,
    collection_kind: CollectionKind,
    query_text: &str,
    limit: u64,
    vector_size: u64,
) -> Result<Vec<SimilarPoint>, SearchSimilarError> {
    if limit == 0 {
        return Ok(vec![]);
    }

    let collection_name = collection_name(user_id, collection_kind);
    let query_vector = embed_text::execute(embeddings_service, query_text, vector_size).await?;

    let mut similar_points = point_repository
        .search(&collection_name, query_vector, limit)
        .await?;

    similar_points.sort_by(|a, b| b.score.total_cmp(&a.score));
    similar_points.truncate(limit as usize);

    info!(nb_results = similar_points.len(), %collection_name, "Search done");
    Ok(similar_points)
}

#[derive(thiserror::Error)]
pub enum SearchSimilarError {
    #[error(transparent)]
    EmbedTextError(#[from] EmbedTextError),
    #[error(transparent)]
    PointRepositoryError(#[from] PointRepositoryError),
}

impl std::fmt::Debug for SearchSimilarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
