use common::helper::error_chain_fmt;

use crate::ports::point_repository::{CollectionCreation, PointRepository, PointRepositoryError};

/// Creates a collection if it does not exist yet
///
/// Returns `true` if the collection was created, `false` if it was already there.
#[tracing::instrument(name = "Creating collection", skip(point_repository))]
pub async fn execute(
    point_repository: &dyn PointRepository,
    collection_name: &str,
    vector_size: u64,
) -> Result<bool, CreateCollectionError> {
    let creation = point_repository
        .create_collection(collection_name, vector_size)
        .await?;

    Ok(creation == CollectionCreation::Created)
}

#[derive(thiserror::Error)]
pub enum CreateCollectionError {
    #[error(transparent)]
    PointRepositoryError(#[from] PointRepositoryError),
}

impl std::fmt::Debug for CreateCollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
