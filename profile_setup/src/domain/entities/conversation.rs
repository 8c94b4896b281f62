use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::point::{Embeddings, Point, PointId, PointPayload};

pub const CONVERSATION_POINT_TYPE: &str = "conversation";

/// One exchange between the user and the assistant
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationRecord {
    pub user_message: String,
    pub assistant_response: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationRecord {
    pub fn new(user_message: &str, assistant_response: &str) -> Self {
        Self {
            user_message: user_message.to_string(),
            assistant_response: assistant_response.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// The text embedded for the whole exchange
    pub fn full_text(&self) -> String {
        format!("{} {}", self.user_message, self.assistant_response)
    }

    /// Every conversation gets a new random id: the same exchange can happen twice
    pub fn into_point(self, vector: Embeddings) -> Point {
        let mut payload = PointPayload::new();
        payload.insert("type".into(), JsonValue::from(CONVERSATION_POINT_TYPE));
        payload.insert("user_message".into(), JsonValue::from(self.user_message));
        payload.insert(
            "assistant_response".into(),
            JsonValue::from(self.assistant_response),
        );
        payload.insert(
            "timestamp".into(),
            JsonValue::from(self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
        );

        Point {
            id: PointId::Uuid(Uuid::new_v4()),
            vector,
            payload,
        }
    }
}
