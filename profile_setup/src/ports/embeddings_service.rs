use async_trait::async_trait;
use common::helper::error_chain_fmt;

use crate::domain::entities::point::Embeddings;

/// Turns a text into its embeddings vector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingsService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embeddings, EmbeddingsServiceError>;
}

/// Any failure of the embeddings service: the caller only needs to know the text could not be embedded
#[derive(thiserror::Error)]
pub enum EmbeddingsServiceError {
    #[error("Embeddings API error: {0}")]
    ApiError(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Unexpected embeddings API response: {0}")]
    UnexpectedResponse(String),
}

impl std::fmt::Debug for EmbeddingsServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
