//! The event envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::ActionType;
use super::topic::EventType;
use crate::result::AppResult;

/// One domain state change, ready for publishing.
///
/// `entity_id` stays stable across the create/update/delete lifecycle of a
/// single entity and doubles as the partition key, so every event for one
/// entity is delivered in publish order. `occurred_at` is monotonic per
/// producer only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub event_type: EventType,
    pub action_type: ActionType,
    pub entity_id: i64,
    pub payload: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl EventEnvelope {
    /// Wrap a serializable payload, stamping the current time.
    pub fn new<P: Serialize>(
        event_type: EventType,
        action_type: ActionType,
        entity_id: i64,
        payload: &P,
    ) -> AppResult<Self> {
        Ok(Self {
            event_type,
            action_type,
            entity_id,
            payload: serde_json::to_value(payload)?,
            occurred_at: Utc::now(),
        })
    }

    /// Topic this envelope is published on.
    pub fn topic(&self) -> &'static str {
        self.event_type.topic()
    }

    /// Broker partition key.
    pub fn partition_key(&self) -> String {
        self.entity_id.to_string()
    }

    /// Bytes placed on the wire. Consumers receive the payload document.
    pub fn to_bytes(&self) -> AppResult<Vec<u8>> {
        Ok(serde_json::to_vec(&self.payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_bytes_are_the_payload() {
        let envelope = EventEnvelope::new(
            EventType::Post,
            ActionType::Create,
            42,
            &json!({"actionType": "CREATE", "postId": 42}),
        )
        .unwrap();
        assert_eq!(envelope.topic(), "post-events");
        assert_eq!(envelope.partition_key(), "42");
        let decoded: serde_json::Value = serde_json::from_slice(&envelope.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded["postId"], 42);
    }
}
