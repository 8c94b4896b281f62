use common::helper::error_chain_fmt;
use std::str::FromStr;

/// Identifier of the user owning the collections, ex: `nana`.
///
/// It is used as-is as the prefix of every collection name, so it can't hold a `/`,
/// whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    pub fn parse(s: &str) -> Result<UserId, UserIdError> {
        if s.is_empty() {
            return Err(UserIdError::Empty);
        }

        if let Some(invalid) = s
            .chars()
            .find(|c| *c == '/' || c.is_whitespace() || c.is_control())
        {
            return Err(UserIdError::InvalidCharacter(invalid, s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(thiserror::Error)]
pub enum UserIdError {
    #[error("User id should not be empty")]
    Empty,
    #[error("Invalid character '{0}' in user id {1}: '/', whitespace and control characters are not allowed")]
    InvalidCharacter(char, String),
}

impl std::fmt::Debug for UserIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// The kinds of per-user collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Profile,
    Conversations,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Profile => "profile",
            CollectionKind::Conversations => "conversations",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKind {
    type Err = CollectionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "profile" => Ok(Self::Profile),
            "conversations" => Ok(Self::Conversations),
            other => Err(CollectionKindError(other.to_string())),
        }
    }
}

#[derive(thiserror::Error)]
#[error("{0} is not a collection kind. Use either `profile` or `conversations`.")]
pub struct CollectionKindError(String);

impl std::fmt::Debug for CollectionKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Name of the collection of the given kind for a user: `{user_id}_{kind}`
pub fn collection_name(user_id: &UserId, kind: CollectionKind) -> String {
    format!("{}_{}", user_id, kind.as_str())
}
