use common::helper::error_chain_fmt;
use tracing::info;

use crate::{
    domain::entities::collection_name::{collection_name, CollectionKind, UserId},
    ports::point_repository::{PointRepository, PointRepositoryError},
    use_cases::create_collection::{self, CreateCollectionError},
};

/// Makes sure the user conversations collection exists
///
/// Returns the number of points it currently holds.
#[tracing::instrument(name = "Setting up conversations collection", skip(point_repository))]
pub async fn execute(
    point_repository: &dyn PointRepository,
    user_id: &UserId,
    vector_size: u64,
) -> Result<u64, SetupConversationsError> {
    let collection_name = collection_name(user_id, CollectionKind::Conversations);
    create_collection::execute(point_repository, &collection_name, vector_size).await?;

    let nb_points = point_repository.count_points(&collection_name).await?;

    info!(nb_points, %collection_name, "Conversations collection ready");
    Ok(nb_points)
}

#[derive(thiserror::Error)]
pub enum SetupConversationsError {
    #[error(transparent)]
    CreateCollectionError(#[from] CreateCollectionError),
    #[error(transparent)]
    PointRepositoryError(#[from] PointRepositoryError),
}

impl std::fmt::Debug for SetupConversationsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
