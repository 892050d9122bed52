//! Profile create and update handlers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use socialhub_core::events::UserEventPayload;
use socialhub_core::result::AppResult;
use socialhub_database::repositories::ProfileRepository;
use socialhub_entity::user::UserProfile;
use socialhub_messaging::{EventHandler, HandleOutcome, InboundMessage};

use super::UserSyncKind;

/// Inserts the profile unless one already exists for the user.
pub struct ProfileCreatedHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileCreatedHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl EventHandler<UserSyncKind> for ProfileCreatedHandler {
    fn kind(&self) -> UserSyncKind {
        UserSyncKind::UserCreated
    }

    async fn handle(&self, message: &InboundMessage) -> AppResult<HandleOutcome> {
        let payload: UserEventPayload = message.decode()?;
        if self
            .profiles
            .insert_if_absent(UserProfile::from(&payload))
            .await?
        {
            info!(user_id = payload.user_id, "Profile replicated");
            Ok(HandleOutcome::Applied)
        } else {
            Ok(HandleOutcome::skipped("profile already exists"))
        }
    }
}

/// Replaces the profile unless the stored copy is newer.
///
/// An update for a user never seen before inserts it: the create may still
/// be in flight on another partition.
pub struct ProfileUpdatedHandler {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileUpdatedHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl EventHandler<UserSyncKind> for ProfileUpdatedHandler {
    fn kind(&self) -> UserSyncKind {
        UserSyncKind::UserUpdated
    }

    async fn handle(&self, message: &InboundMessage) -> AppResult<HandleOutcome> {
        let payload: UserEventPayload = message.decode()?;
        if self
            .profiles
            .upsert_if_newer(UserProfile::from(&payload))
            .await?
        {
            info!(user_id = payload.user_id, "Profile updated");
            Ok(HandleOutcome::Applied)
        } else {
            Ok(HandleOutcome::skipped("stored profile is newer"))
        }
    }
}
