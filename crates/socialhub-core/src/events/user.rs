//! `user-events` payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle marker on user events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserEventType {
    UserCreated,
    UserUpdated,
}

/// Profile fields replicated to every service that keeps a user copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEventPayload {
    pub user_id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub event_type: UserEventType,
}

impl UserEventPayload {
    /// Timestamp used for last-write-wins comparisons.
    pub fn version(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// `first last`, trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_minimal_document_and_ignores_unknown_fields() {
        let payload: UserEventPayload = serde_json::from_str(
            r#"{"userId":7,"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com",
                "createdAt":"2024-03-01T10:00:00Z","eventType":"USER_CREATED","avatar":"x.png"}"#,
        )
        .unwrap();
        assert_eq!(payload.user_id, 7);
        assert_eq!(payload.phone_number, None);
        assert_eq!(payload.event_type, UserEventType::UserCreated);
        assert_eq!(payload.version(), payload.created_at);
        assert_eq!(payload.display_name(), "Ada Lovelace");
    }
}
