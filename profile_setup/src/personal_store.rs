use std::{path::Path, sync::Arc};

use tracing::{error, info};

use crate::{
    domain::entities::{
        collection_name::{collection_name, CollectionKind, UserId},
        conversation::ConversationRecord,
        point::{PointId, SimilarPoint},
    },
    ports::{embeddings_service::EmbeddingsService, point_repository::PointRepository},
    use_cases::{
        add_conversation::{self, AddConversationError},
        create_collection::{self, CreateCollectionError},
        search_similar::{self, SearchSimilarError},
        setup_conversations::{self, SetupConversationsError},
        upload_profile::{self, UploadProfileError},
    },
};

/// Vector store of one user: the profile and conversations collections of `user_id`.
///
/// Each operation comes in two flavors:
/// - `try_*` returns the typed error of the use case
/// - the plain one logs any failure and returns `false` (or no results), nothing is propagated
pub struct PersonalStore {
    user_id: UserId,
    embeddings_service: Arc<dyn EmbeddingsService>,
    point_repository: Arc<dyn PointRepository>,
    vector_size: u64,
}

impl PersonalStore {
    pub fn new(
        user_id: UserId,
        embeddings_service: Arc<dyn EmbeddingsService>,
        point_repository: Arc<dyn PointRepository>,
        vector_size: u64,
    ) -> Self {
        Self {
            user_id,
            embeddings_service,
            point_repository,
            vector_size,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn collection_name(&self, kind: CollectionKind) -> String {
        collection_name(&self.user_id, kind)
    }

    pub async fn try_create_collection(
        &self,
        collection_name: &str,
        vector_size: u64,
    ) -> Result<bool, CreateCollectionError> {
        create_collection::execute(self.point_repository.as_ref(), collection_name, vector_size)
            .await
    }

    /// Returns `true` once the collection exists, whether it was just created or not
    pub async fn create_collection(&self, collection_name: &str, vector_size: u64) -> bool {
        match self.try_create_collection(collection_name, vector_size).await {
            Ok(created) => {
                info!(created, collection_name, "Collection ready");
                true
            }
            Err(error) => {
                error!(?error, collection_name, "Failed to create collection");
                false
            }
        }
    }

    pub async fn try_upload_profile(&self, json_file: &Path) -> Result<usize, UploadProfileError> {
        upload_profile::execute(
            self.point_repository.as_ref(),
            self.embeddings_service.as_ref(),
            &self.user_id,
            json_file,
            self.vector_size,
        )
        .await
    }

    pub async fn upload_profile(&self, json_file: &Path) -> bool {
        match self.try_upload_profile(json_file).await {
            Ok(_) => true,
            Err(error) => {
                error!(?error, user_id = %self.user_id, "Error uploading profile");
                false
            }
        }
    }

    pub async fn try_setup_conversation_collection(&self) -> Result<u64, SetupConversationsError> {
        setup_conversations::execute(
            self.point_repository.as_ref(),
            &self.user_id,
            self.vector_size,
        )
        .await
    }

    pub async fn setup_conversation_collection(&self) -> bool {
        match self.try_setup_conversation_collection().await {
            Ok(_) => true,
            Err(error) => {
                error!(?error, user_id = %self.user_id, "Error setting up conversations collection");
                false
            }
        }
    }

    pub async fn try_add_conversation(
        &self,
        user_message: &str,
        assistant_response: &str,
    ) -> Result<PointId, AddConversationError> {
        add_conversation::execute(
            self.point_repository.as_ref(),
            self.embeddings_service.as_ref(),
            &self.user_id,
            ConversationRecord::new(user_message, assistant_response),
            self.vector_size,
        )
        .await
    }

    pub async fn add_conversation(&self, user_message: &str, assistant_response: &str) -> bool {
        match self
            .try_add_conversation(user_message, assistant_response)
            .await
        {
            Ok(_) => true,
            Err(error) => {
                error!(?error, user_id = %self.user_id, "Error adding conversation");
                false
            }
        }
    }

    pub async fn try_search_similar(
        &self,
        collection_kind: CollectionKind,
        query_text: &str,
        limit: u64,
    ) -> Result<Vec<SimilarPoint>, SearchSimilarError> {
        search_similar::execute(
            self.point_repository.as_ref(),
            self.embeddings_service.as_ref(),
            &self.user_id,
            collection_kind,
            query_text,
            limit,
            self.vector_size,
        )
        .await
    }

    pub async fn search_similar(
        &self,
        collection_kind: CollectionKind,
        query_text: &str,
        limit: u64,
    ) -> Vec<SimilarPoint> {
        self.try_search_similar(collection_kind, query_text, limit)
            .await
            .unwrap_or_else(|error| {
                error!(?error, user_id = %self.user_id, "Error searching");
                vec![]
            })
    }
}
