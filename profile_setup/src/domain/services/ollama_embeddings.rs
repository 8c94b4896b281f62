use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{
    configuration::EmbeddingsSettings,
    domain::entities::point::Embeddings,
    ports::embeddings_service::{EmbeddingsService, EmbeddingsServiceError},
};

/// Service to generate embeddings from a text, using a model served by Ollama.
///
/// One HTTP request per text: `POST {base_url}/api/embeddings` with `{model, prompt}`.
/// With `nomic-embed-text`, texts are mapped to a 768 dimensional dense vector space.
pub struct OllamaEmbeddingsService {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Embeddings,
}

impl OllamaEmbeddingsService {
    pub fn try_new(settings: &EmbeddingsSettings) -> Result<Self, EmbeddingsServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| EmbeddingsServiceError::ApiError(Box::new(e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl EmbeddingsService for OllamaEmbeddingsService {
    #[tracing::instrument(name = "Generating embeddings with Ollama", skip(self, text), fields(model = %self.model, text_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Embeddings, EmbeddingsServiceError> {
        let body: JsonValue = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| EmbeddingsServiceError::ApiError(Box::new(e)))?
            .json()
            .await
            .map_err(|e| EmbeddingsServiceError::UnexpectedResponse(e.to_string()))?;

        let EmbeddingResponse { embedding } = serde_json::from_value(body)
            .map_err(|e| EmbeddingsServiceError::UnexpectedResponse(e.to_string()))?;

        debug!(dimension = embedding.len(), "Received embeddings");
        Ok(embedding)
    }
}
