use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        self, point_id::PointIdOptions, CreateCollectionBuilder, Distance, PointStruct,
        SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
    },
    Payload, Qdrant, QdrantError,
};
use serde_json::Value as JsonValue;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::entities::point::{Embeddings, Point, PointId, PointPayload, SimilarPoint},
    ports::point_repository::{CollectionCreation, PointRepository, PointRepositoryError},
};

/// Repository for the points of the per-user collections persisted in Qdrant
pub struct PointQdrantRepository {
    client: Qdrant,
}

impl PointQdrantRepository {
    pub fn new(client: Qdrant) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PointRepository for PointQdrantRepository {
    #[tracing::instrument(name = "Creating Qdrant collection", skip(self))]
    async fn create_collection(
        &self,
        collection_name: &str,
        vector_size: u64,
    ) -> Result<CollectionCreation, PointRepositoryError> {
        if self
            .client
            .collection_exists(collection_name)
            .await
            .map_err(qdrant_error)?
        {
            info!("Collection already exists");
            return Ok(CollectionCreation::AlreadyExists);
        }

        match self
            .client
            .create_collection(
                CreateCollectionBuilder::new(collection_name)
                    .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine)),
            )
            .await
        {
            Ok(_) => {
                info!("Collection created");
                Ok(CollectionCreation::Created)
            }
            // Created by someone else in between
            Err(error) if error.to_string().contains("already exists") => {
                info!("Collection already exists");
                Ok(CollectionCreation::AlreadyExists)
            }
            Err(error) => Err(qdrant_error(error)),
        }
    }

    #[tracing::instrument(name = "Saving points to Qdrant", skip(self, points), fields(nb_points = points.len()))]
    async fn batch_save(
        &self,
        collection_name: &str,
        points: Vec<Point>,
    ) -> Result<(), PointRepositoryError> {
        let points = points
            .into_iter()
            .map(PointStruct::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        // Waits for the points to be applied, so that they are counted right after
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection_name, points).wait(true))
            .await
            .map_err(|e| collection_error(collection_name, e))?;

        info!("Saved points");
        Ok(())
    }

    #[tracing::instrument(name = "Counting points in Qdrant collection", skip(self))]
    async fn count_points(&self, collection_name: &str) -> Result<u64, PointRepositoryError> {
        let info = self
            .client
            .collection_info(collection_name)
            .await
            .map_err(|e| collection_error(collection_name, e))?;

        Ok(info
            .result
            .and_then(|collection| collection.points_count)
            .unwrap_or_default())
    }

    #[tracing::instrument(name = "Searching similar points in Qdrant", skip(self, vector))]
    async fn search(
        &self,
        collection_name: &str,
        vector: Embeddings,
        limit: u64,
    ) -> Result<Vec<SimilarPoint>, PointRepositoryError> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection_name, vector, limit).with_payload(true),
            )
            .await
            .map_err(|e| collection_error(collection_name, e))?;

        response
            .result
            .into_iter()
            .map(SimilarPoint::try_from)
            .collect()
    }
}

fn qdrant_error(error: QdrantError) -> PointRepositoryError {
    PointRepositoryError::QdrantError(error.to_string())
}

/// Qdrant answers with a "Not found" status and a "doesn't exist" message for missing collections
fn collection_error(collection_name: &str, error: QdrantError) -> PointRepositoryError {
    let message = error.to_string();
    if message.contains("doesn't exist") || message.contains("Not found") {
        PointRepositoryError::CollectionNotFound(collection_name.to_string())
    } else {
        PointRepositoryError::QdrantError(message)
    }
}

impl From<PointId> for qdrant::PointId {
    fn from(id: PointId) -> Self {
        match id {
            PointId::Num(num) => num.into(),
            PointId::Uuid(uuid) => uuid.to_string().into(),
        }
    }
}

impl TryFrom<qdrant::PointId> for PointId {
    type Error = PointRepositoryError;

    fn try_from(id: qdrant::PointId) -> Result<Self, Self::Error> {
        match id.point_id_options {
            Some(PointIdOptions::Num(num)) => Ok(PointId::Num(num)),
            Some(PointIdOptions::Uuid(uuid)) => Uuid::parse_str(&uuid)
                .map(PointId::Uuid)
                .map_err(|e| PointRepositoryError::InvalidPoint(format!("Invalid UUID: {}", e))),
            None => Err(PointRepositoryError::InvalidPoint(
                "Missing point id".into(),
            )),
        }
    }
}

impl TryFrom<Point> for PointStruct {
    type Error = PointRepositoryError;

    fn try_from(point: Point) -> Result<Self, Self::Error> {
        let payload = Payload::try_from(JsonValue::Object(point.payload))
            .map_err(|e| PointRepositoryError::InvalidPoint(e.to_string()))?;

        Ok(PointStruct::new(
            qdrant::PointId::from(point.id),
            point.vector,
            payload,
        ))
    }
}

impl TryFrom<qdrant::ScoredPoint> for SimilarPoint {
    type Error = PointRepositoryError;

    fn try_from(point: qdrant::ScoredPoint) -> Result<Self, Self::Error> {
        Ok(SimilarPoint {
            id: point.id.map(PointId::try_from).transpose()?,
            score: point.score,
            payload: payload_to_json(point.payload),
        })
    }
}

fn payload_to_json(payload: HashMap<String, qdrant::Value>) -> PointPayload {
    payload
        .into_iter()
        .map(|(key, value)| (key, value.into_json()))
        .collect()
}
