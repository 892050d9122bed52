//! Presence registry keyed by session.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use tracing::debug;

use socialhub_entity::presence::PresenceRecord;

/// Effect of a session connecting or disconnecting on its user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceChange {
    /// The user's first session connected.
    #[serde(rename_all = "camelCase")]
    UserOnline { user_id: i64 },
    /// The user's last session disconnected.
    #[serde(rename_all = "camelCase")]
    UserOffline { user_id: i64 },
    /// The user still has other sessions; nothing visible changed.
    Unchanged,
}

/// Connected chat sessions.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    sessions: DashMap<String, PresenceRecord>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session. Re-registering a session id replaces it.
    pub fn add(&self, session_id: impl Into<String>, user_id: i64) -> PresenceChange {
        let session_id = session_id.into();
        let was_online = self.is_online(user_id);
        let record = PresenceRecord {
            session_id: session_id.clone(),
            user_id,
            connected_at: Utc::now(),
        };
        self.sessions.insert(session_id.clone(), record);
        debug!(session_id = %session_id, user_id, "Session connected");

        if was_online {
            PresenceChange::Unchanged
        } else {
            PresenceChange::UserOnline { user_id }
        }
    }

    /// Register a session unless the id is held by another user, in which
    /// case that user's id is returned. The ownership check and the write
    /// happen under one entry lock.
    pub fn add_if_owned_or_vacant(
        &self,
        session_id: impl Into<String>,
        user_id: i64,
    ) -> Result<PresenceChange, i64> {
        let session_id = session_id.into();
        let was_online = self.is_online(user_id);
        let record = PresenceRecord {
            session_id: session_id.clone(),
            user_id,
            connected_at: Utc::now(),
        };
        match self.sessions.entry(session_id.clone()) {
            Entry::Occupied(entry) if entry.get().user_id != user_id => {
                return Err(entry.get().user_id);
            }
            Entry::Occupied(mut entry) => {
                entry.insert(record);
            }
            Entry::Vacant(entry) => {
                entry.insert(record);
            }
        }
        debug!(session_id = %session_id, user_id, "Session connected");

        Ok(if was_online {
            PresenceChange::Unchanged
        } else {
            PresenceChange::UserOnline { user_id }
        })
    }

    /// Remove a session only if `user_id` owns it. `None` if the session is
    /// unknown or belongs to someone else.
    pub fn remove_owned(&self, session_id: &str, user_id: i64) -> Option<PresenceChange> {
        self.sessions
            .remove_if(session_id, |_, record| record.user_id == user_id)?;
        debug!(session_id = %session_id, user_id, "Session disconnected");
        Some(if self.is_online(user_id) {
            PresenceChange::Unchanged
        } else {
            PresenceChange::UserOffline { user_id }
        })
    }

    /// Remove a session. Unknown session ids are ignored.
    pub fn remove(&self, session_id: &str) -> PresenceChange {
        let Some((_, record)) = self.sessions.remove(session_id) else {
            return PresenceChange::Unchanged;
        };
        debug!(session_id = %session_id, user_id = record.user_id, "Session disconnected");
        if self.is_online(record.user_id) {
            PresenceChange::Unchanged
        } else {
            PresenceChange::UserOffline {
                user_id: record.user_id,
            }
        }
    }

    pub fn session(&self, session_id: &str) -> Option<PresenceRecord> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    pub fn is_online(&self, user_id: i64) -> bool {
        self.sessions.iter().any(|entry| entry.user_id == user_id)
    }

    /// Owned copy of every session at the time of the call.
    pub fn snapshot(&self) -> HashMap<String, PresenceRecord> {
        self.sessions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Distinct online users, ascending.
    pub fn online_user_ids(&self) -> Vec<i64> {
        self.sessions
            .iter()
            .map(|entry| entry.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
