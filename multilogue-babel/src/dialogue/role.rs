use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversational role a model API uses to interpret a turn.
///
/// The well-known roles get their own variants; anything else that is still a
/// bare identifier is carried verbatim in [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    #[default]
    User,
    Assistant,
    System,
    Other(String),
}

impl Role {
    /// Parse a role identifier. Matching is exact: `"User"` is not `user`.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if !is_identifier(raw) {
            return Err(ValidationError::InvalidRole(raw.to_string()));
        }
        Ok(match raw {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            other => Role::Other(other.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Other(name) => name,
        }
    }
}

/// Bare identifier: non-empty, ASCII alphanumerics, `_` or `-`.
pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::new(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}
