use std::path::{Path, PathBuf};

use common::helper::error_chain_fmt;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::point::{Embeddings, Point, PointId, PointPayload};

/// A block of the user profile, as written in the uploaded JSON file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfileBlock {
    pub id: BlockId,
    pub text: String,
    pub category: String,
}

/// Blocks can be identified either by a (non-negative) number or by a string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BlockId {
    Num(u64),
    Text(String),
}

impl From<&BlockId> for PointId {
    /// A string id is kept if it is a UUID, otherwise a UUID v5 is derived from it.
    /// The derivation is deterministic: uploading the same block again overwrites its point.
    fn from(block_id: &BlockId) -> Self {
        match block_id {
            BlockId::Num(num) => PointId::Num(*num),
            BlockId::Text(text) => match Uuid::parse_str(text) {
                Ok(uuid) => PointId::Uuid(uuid),
                Err(_) => PointId::Uuid(Uuid::new_v5(&Uuid::NAMESPACE_OID, text.as_bytes())),
            },
        }
    }
}

impl ProfileBlock {
    /// Parses a JSON array of profile blocks
    pub fn try_parsing_list(data: &[u8]) -> Result<Vec<Self>, ProfileBlocksError> {
        let data = std::str::from_utf8(data)?;
        let value: JsonValue =
            serde_json::from_str(data).map_err(ProfileBlocksError::InvalidJsonData)?;

        serde_json::from_value(value).map_err(ProfileBlocksError::InvalidBlocks)
    }

    pub fn into_point(self, vector: Embeddings) -> Point {
        let mut payload = PointPayload::new();
        payload.insert("text".into(), JsonValue::from(self.text));
        payload.insert("category".into(), JsonValue::from(self.category));

        Point {
            id: PointId::from(&self.id),
            vector,
            payload,
        }
    }
}

/// Checks that the file exists and holds valid JSON, whatever its shape
pub fn validate_json_file(path: &Path) -> Result<(), ProfileBlocksError> {
    let data = read_file(path)?;
    let data = std::str::from_utf8(&data)?;
    serde_json::from_str::<JsonValue>(data).map_err(ProfileBlocksError::InvalidJsonData)?;
    Ok(())
}

/// Loads the profile blocks from a JSON file containing an array of `{id, text, category}`
pub fn load_profile_blocks(path: &Path) -> Result<Vec<ProfileBlock>, ProfileBlocksError> {
    let data = read_file(path)?;
    ProfileBlock::try_parsing_list(&data)
}

fn read_file(path: &Path) -> Result<Vec<u8>, ProfileBlocksError> {
    std::fs::read(path).map_err(|error| match error.kind() {
        std::io::ErrorKind::NotFound => ProfileBlocksError::FileNotFound(path.to_path_buf()),
        _ => ProfileBlocksError::UnreadableFile(path.to_path_buf(), error),
    })
}

#[derive(thiserror::Error)]
pub enum ProfileBlocksError {
    #[error("File {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("File {} could not be read", .0.display())]
    UnreadableFile(PathBuf, #[source] std::io::Error),

    #[error("Data could not be converted from utf8 u8 vector to string")]
    InvalidStringData(#[from] std::str::Utf8Error),

    #[error("Data is not valid JSON: {0}")]
    InvalidJsonData(#[source] serde_json::Error),

    #[error("Data is not an array of {{id, text, category}} blocks: {0}")]
    InvalidBlocks(#[source] serde_json::Error),
}

impl std::fmt::Debug for ProfileBlocksError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
