//! Action kinds carried by content events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// What happened to the subject entity.
///
/// Serialized as `CREATE`, `UPDATE`, `DELETE` or `REPLY`. Deserialization
/// also accepts the entity-qualified past-tense form some producers emit
/// (`POST_CREATED`, `COMMENT_REPLIED`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum ActionType {
    Create,
    Update,
    Delete,
    Reply,
}

impl ActionType {
    /// The canonical wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Reply => "REPLY",
        }
    }

    /// Whether the action creates or replaces the entity's state.
    pub fn is_upsert(&self) -> bool {
        !matches!(self, Self::Delete)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let verb = upper.rsplit('_').next().unwrap_or(&upper);
        match verb {
            "CREATE" | "CREATED" => Ok(Self::Create),
            "UPDATE" | "UPDATED" => Ok(Self::Update),
            "DELETE" | "DELETED" => Ok(Self::Delete),
            "REPLY" | "REPLIED" => Ok(Self::Reply),
            _ => Err(AppError::validation(format!("Unknown action type '{s}'"))),
        }
    }
}

impl TryFrom<String> for ActionType {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
