use std::{sync::Arc, time::Duration};

use common::helper::error_chain_fmt;
use qdrant_client::Qdrant;
use secrecy::ExposeSecret;
use tracing::info;

use crate::{
    configuration::{QdrantSettings, Settings},
    domain::{entities::collection_name::UserId, services::ollama_embeddings::OllamaEmbeddingsService},
    personal_store::PersonalStore,
    ports::embeddings_service::EmbeddingsServiceError,
    repositories::point_qdrant_repository::PointQdrantRepository,
};

/// Holds the store of the user, connected to Qdrant and to the embeddings service
pub struct Application {
    store: PersonalStore,
}

impl Application {
    /// Connects to Qdrant and checks it answers: a store that can't be reached fails here,
    /// before any operation is started.
    #[tracing::instrument(name = "Building application", skip(settings))]
    pub async fn build(settings: Settings, user_id: UserId) -> Result<Self, ApplicationError> {
        let qdrant_client = get_qdrant_client(&settings.qdrant).await?;
        let point_repository = PointQdrantRepository::new(qdrant_client);

        let embeddings_service = OllamaEmbeddingsService::try_new(&settings.embeddings)?;

        let store = PersonalStore::new(
            user_id,
            Arc::new(embeddings_service),
            Arc::new(point_repository),
            settings.qdrant.collection_vector_size,
        );

        Ok(Self { store })
    }

    pub fn store(&self) -> &PersonalStore {
        &self.store
    }
}

/// Sets up a client to Qdrant and checks the connection
pub async fn get_qdrant_client(config: &QdrantSettings) -> Result<Qdrant, ApplicationError> {
    let mut qdrant_config = Qdrant::from_url(&config.get_grpc_base_url())
        .timeout(Duration::from_secs(config.timeout_secs));

    if let Some(api_key) = &config.api_key {
        qdrant_config = qdrant_config.api_key(api_key.expose_secret().to_string());
    }

    let client = qdrant_config
        .build()
        .map_err(|e| ApplicationError::QdrantError(e.to_string()))?;

    let health = client
        .health_check()
        .await
        .map_err(|e| ApplicationError::QdrantConnectionError(config.get_grpc_base_url(), e.to_string()))?;

    info!(version = %health.version, "Connected to Qdrant");
    Ok(client)
}

#[derive(thiserror::Error)]
pub enum ApplicationError {
    #[error("Error from Qdrant: {0}")]
    QdrantError(String),
    #[error("Failed to connect to Qdrant at {0}: {1}")]
    QdrantConnectionError(String, String),
    #[error(transparent)]
    EmbeddingsServiceError(#[from] EmbeddingsServiceError),
}

impl std::fmt::Debug for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
