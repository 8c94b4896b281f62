use common::helper::error_chain_fmt;
use tracing::info;

use crate::{
    domain::entities::{
        collection_name::{collection_name, CollectionKind, UserId},
        conversation::ConversationRecord,
        point::PointId,
    },
    ports::{
        embeddings_service::EmbeddingsService,
        point_repository::{PointRepository, PointRepositoryError},
    },
    use_cases::embed_text::{self, EmbedTextError},
};

/// Stores an exchange in the user conversations collection, embedded as a whole
///
/// The collection is expected to exist (see `setup_conversations`).
/// Returns the id of the new point.
#[tracing::instrument(
    name = "Adding conversation",
    skip(point_repository, embeddings_service, record),
    fields(timestamp = %record.timestamp)
)]
pub async fn execute(
    point_repository: &dyn PointRepository,
    embeddings_service: &dyn EmbeddingsService,
    user_id: &UserId,
    record: ConversationRecord,
    vector_size: u64,
) -> Result<PointId, AddConversationError> {
    let collection_name = collection_name(user_id, CollectionKind::Conversations);

    let vector = embed_text::execute(embeddings_service, &record.full_text(), vector_size).await?;
    let point = record.into_point(vector);
    let point_id = point.id;

    point_repository
        .batch_save(&collection_name, vec![point])
        .await?;

    info!(%point_id, %collection_name, "Conversation added");
    Ok(point_id)
}

#[derive(thiserror::Error)]
pub enum AddConversationError {
    #[error(transparent)]
    EmbedTextError(#[from] EmbedTextError),
    #[error(transparent)]
    PointRepositoryError(#[from] PointRepositoryError),
}

impl std::fmt::Debug for AddConversationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
