use std::path::Path;

use common::helper::error_chain_fmt;
use tracing::info;

use crate::{
    domain::entities::{
        collection_name::{collection_name, CollectionKind, UserId},
        profile_block::{load_profile_blocks, ProfileBlocksError},
    },
    ports::{
        embeddings_service::EmbeddingsService,
        point_repository::{PointRepository, PointRepositoryError},
    },
    use_cases::{
        create_collection::{self, CreateCollectionError},
        embed_text::{self, EmbedTextError},
    },
};

/// Uploads the profile blocks of a JSON file to the user profile collection
///
/// The file is loaded and validated before any call to the store or the embeddings service.
/// Blocks are embedded one by one, in order, then all saved in a single upsert.
///
/// Returns the number of uploaded blocks.
#[tracing::instrument(
    name = "Uploading profile",
    skip(point_repository, embeddings_service)
)]
pub async fn execute(
    point_repository: &dyn PointRepository,
    embeddings_service: &dyn EmbeddingsService,
    user_id: &UserId,
    json_file: &Path,
    vector_size: u64,
) -> Result<usize, UploadProfileError> {
    let blocks = load_profile_blocks(json_file)?;

    let collection_name = collection_name(user_id, CollectionKind::Profile);
    create_collection::execute(point_repository, &collection_name, vector_size).await?;

    let mut points = Vec::with_capacity(blocks.len());
    for block in blocks {
        let vector = embed_text::execute(embeddings_service, &block.text, vector_size).await?;
        points.push(block.into_point(vector));
    }

    let nb_points = points.len();
    if nb_points > 0 {
        point_repository
            .batch_save(&collection_name, points)
            .await?;
    }

    info!(nb_points, %collection_name, "Profile blocks uploaded");
    Ok(nb_points)
}

#[derive(thiserror::Error)]
pub enum UploadProfileError {
    #[error(transparent)]
    ProfileBlocksError(#[from] ProfileBlocksError),
    #[error(transparent)]
    CreateCollectionError(#[from] CreateCollectionError),
    #[error(transparent)]
    EmbedTextError(#[from] EmbedTextError),
    #[error(transparent)]
    PointRepositoryError(#[from] PointRepositoryError),
}

impl std::fmt::Debug for UploadProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
