use common::helper::error_chain_fmt;

use crate::{
    domain::entities::point::Embeddings,
    ports::embeddings_service::{EmbeddingsService, EmbeddingsServiceError},
};

/// Embeds a text, checking the vector fits the collections
pub async fn execute(
    embeddings_service: &dyn EmbeddingsService,
    text: &str,
    vector_size: u64,
) -> Result<Embeddings, EmbedTextError> {
    let embeddings = embeddings_service.embed(text).await?;

    if embeddings.len() as u64 != vector_size {
        return Err(EmbedTextError::VectorSizeMismatch {
            expected: vector_size,
            actual: embeddings.len(),
        });
    }

    Ok(embeddings)
}

#[derive(thiserror::Error)]
pub enum EmbedTextError {
    #[error(transparent)]
    EmbeddingsServiceError(#[from] EmbeddingsServiceError),
    #[error("Embeddings of size {actual} do not fit collections of vector size {expected}")]
    VectorSizeMismatch { expected: u64, actual: usize },
}

impl std::fmt::Debug for EmbedTextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
