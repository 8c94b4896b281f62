use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

pub type Embeddings = Vec<f32>;

/// Arbitrary JSON object attached to a point
pub type PointPayload = Map<String, JsonValue>;

/// Qdrant only accepts unsigned integers and UUIDs as point ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointId {
    Num(u64),
    Uuid(Uuid),
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointId::Num(num) => num.fmt(f),
            PointId::Uuid(uuid) => uuid.fmt(f),
        }
    }
}

/// A vector and its payload, as written to a collection
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub id: PointId,
    pub vector: Embeddings,
    pub payload: PointPayload,
}

/// A point found by a similarity search, without its vector
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarPoint {
    pub id: Option<PointId>,
    pub score: f32,
    pub payload: PointPayload,
}

impl SimilarPoint {
    /// The `text` field of the payload if any: set on profile blocks
    pub fn text(&self) -> Option<&str> {
        self.payload.get("text").and_then(JsonValue::as_str)
    }
}
