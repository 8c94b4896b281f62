use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use common::telemetry::{get_tracing_subscriber, init_tracing_subscriber};
use once_cell::sync::Lazy;
use profile_setup::{
    domain::entities::{
        collection_name::UserId,
        point::{Embeddings, Point, PointId, SimilarPoint},
    },
    personal_store::PersonalStore,
    ports::{
        embeddings_service::{EmbeddingsService, EmbeddingsServiceError},
        point_repository::{CollectionCreation, PointRepository, PointRepositoryError},
    },
};
use uuid::Uuid;

pub const VECTOR_SIZE: u64 = 768;

// Ensures that the `tracing` stack is only initialized once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // The sink is part of the subscriber type, hence the two branches
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            get_tracing_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_tracing_subscriber(subscriber);
    } else {
        let subscriber =
            get_tracing_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_tracing_subscriber(subscriber);
    };
});

struct InMemoryCollection {
    vector_size: u64,
    points: HashMap<PointId, Point>,
}

/// Qdrant stand-in: collections of points kept in memory, searched by cosine similarity
#[derive(Default)]
pub struct InMemoryPointRepository {
    collections: Mutex<HashMap<String, InMemoryCollection>>,
    pub nb_create_calls: AtomicUsize,
    pub nb_save_calls: AtomicUsize,
    pub nb_search_calls: AtomicUsize,
}

impl InMemoryPointRepository {
    pub fn collection_exists(&self, collection_name: &str) -> bool {
        self.collections
            .lock()
            .unwrap()
            .contains_key(collection_name)
    }

    pub fn points(&self, collection_name: &str) -> Vec<Point> {
        self.collections
            .lock()
            .unwrap()
            .get(collection_name)
            .map(|collection| collection.points.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn nb_calls(&self) -> usize {
        self.nb_create_calls.load(Ordering::SeqCst)
            + self.nb_save_calls.load(Ordering::SeqCst)
            + self.nb_search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PointRepository for InMemoryPointRepository {
    async fn create_collection(
        &self,
        collection_name: &str,
        vector_size: u64,
    ) -> Result<CollectionCreation, PointRepositoryError> {
        self.nb_create_calls.fetch_add(1, Ordering::SeqCst);
        let mut collections = self.collections.lock().unwrap();

        if collections.contains_key(collection_name) {
            return Ok(CollectionCreation::AlreadyExists);
        }

        collections.insert(
            collection_name.to_string(),
            InMemoryCollection {
                vector_size,
                points: HashMap::new(),
            },
        );
        Ok(CollectionCreation::Created)
    }

    async fn batch_save(
        &self,
        collection_name: &str,
        points: Vec<Point>,
    ) -> Result<(), PointRepositoryError> {
        self.nb_save_calls.fetch_add(1, Ordering::SeqCst);
        let mut collections = self.collections.lock().unwrap();
        let collection = collections
            .get_mut(collection_name)
            .ok_or_else(|| PointRepositoryError::CollectionNotFound(collection_name.into()))?;

        for point in points {
            if point.vector.len() as u64 != collection.vector_size {
                return Err(PointRepositoryError::InvalidPoint(format!(
                    "vector of size {}",
                    point.vector.len()
                )));
            }
            collection.points.insert(point.id, point);
        }
        Ok(())
    }

    async fn count_points(&self, collection_name: &str) -> Result<u64, PointRepositoryError> {
        self.collections
            .lock()
            .unwrap()
            .get(collection_name)
            .map(|collection| collection.points.len() as u64)
            .ok_or_else(|| PointRepositoryError::CollectionNotFound(collection_name.into()))
    }

    async fn search(
        &self,
        collection_name: &str,
        vector: Embeddings,
        limit: u64,
    ) -> Result<Vec<SimilarPoint>, PointRepositoryError> {
        self.nb_search_calls.fetch_add(1, Ordering::SeqCst);
        let collections = self.collections.lock().unwrap();
        let collection = collections
            .get(collection_name)
            .ok_or_else(|| PointRepositoryError::CollectionNotFound(collection_name.into()))?;

        let mut similar_points: Vec<SimilarPoint> = collection
            .points
            .values()
            .map(|point| SimilarPoint {
                id: Some(point.id),
                score: cosine_similarity(&vector, &point.vector),
                payload: point.payload.clone(),
            })
            .collect();
        similar_points.sort_by(|a, b| b.score.total_cmp(&a.score));
        similar_points.truncate(limit as usize);

        Ok(similar_points)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Deterministic embeddings: a bag of character trigrams hashed over `vector_size` dimensions
pub struct FakeEmbeddingsService {
    vector_size: usize,
    failing: bool,
    pub nb_calls: AtomicUsize,
}

impl FakeEmbeddingsService {
    pub fn new(vector_size: usize) -> Self {
        Self {
            vector_size,
            failing: false,
            nb_calls: AtomicUsize::new(0),
        }
    }

    /// Every request fails, as an unreachable server would
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new(VECTOR_SIZE as usize)
        }
    }

    pub fn nb_calls(&self) -> usize {
        self.nb_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingsService for FakeEmbeddingsService {
    async fn embed(&self, text: &str) -> Result<Embeddings, EmbeddingsServiceError> {
        self.nb_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(EmbeddingsServiceError::ApiError("connection refused".into()));
        }

        let chars: Vec<char> = text.to_lowercase().chars().collect();
        let mut vector = vec![0.0; self.vector_size];
        for trigram in chars.windows(3) {
            let hash = trigram
                .iter()
                .fold(7usize, |hash, c| hash.wrapping_mul(31).wrapping_add(*c as usize));
            vector[hash % self.vector_size] += 1.0;
        }
        if chars.len() < 3 {
            vector[0] = 1.0;
        }
        Ok(vector)
    }
}

pub struct TestStore {
    pub store: PersonalStore,
    pub point_repository: Arc<InMemoryPointRepository>,
    pub embeddings_service: Arc<FakeEmbeddingsService>,
}

pub fn spawn_store(user_id: &str) -> TestStore {
    spawn_store_with(user_id, FakeEmbeddingsService::new(VECTOR_SIZE as usize))
}

pub fn spawn_store_with(user_id: &str, embeddings_service: FakeEmbeddingsService) -> TestStore {
    Lazy::force(&TRACING);

    let point_repository = Arc::new(InMemoryPointRepository::default());
    let embeddings_service = Arc::new(embeddings_service);
    let store = PersonalStore::new(
        UserId::parse(user_id).unwrap(),
        embeddings_service.clone(),
        point_repository.clone(),
        VECTOR_SIZE,
    );

    TestStore {
        store,
        point_repository,
        embeddings_service,
    }
}

/// Writes `content` to a new file of the temp directory, removed on drop
pub struct TempFile {
    pub path: PathBuf,
}

impl TempFile {
    pub fn new(content: &str) -> Self {
        let path = std::env::temp_dir().join(format!("profile_{}.json", Uuid::new_v4()));
        std::fs::write(&path, content).unwrap();
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
