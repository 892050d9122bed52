//! Topic registry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed enumeration of event families, each bound to one broker topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Post,
    Comment,
    User,
    Notification,
    Like,
    Follow,
    Message,
    Activity,
}

impl EventType {
    /// Every event type, in registry order.
    pub const ALL: [EventType; 8] = [
        Self::Post,
        Self::Comment,
        Self::User,
        Self::Notification,
        Self::Like,
        Self::Follow,
        Self::Message,
        Self::Activity,
    ];

    /// Wire name of the topic carrying this event type.
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::Post => "post-events",
            Self::Comment => "comment-events",
            Self::User => "user-events",
            Self::Notification => "notification-events",
            Self::Like => "like-events",
            Self::Follow => "follow-events",
            Self::Message => "message-events",
            Self::Activity => "activity-events",
        }
    }

    /// Resolve a topic wire name back to its event type.
    pub fn from_topic(topic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.topic() == topic)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.topic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_names_are_unique_and_reversible() {
        for event_type in EventType::ALL {
            assert_eq!(EventType::from_topic(event_type.topic()), Some(event_type));
        }
        let mut names: Vec<_> = EventType::ALL.iter().map(|t| t.topic()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EventType::ALL.len());
    }

    #[test]
    fn test_unknown_topic() {
        assert_eq!(EventType::from_topic("payment-events"), None);
    }
}
