//! Social write paths that raise notification events.

pub mod friendship;
pub mod likes;

use std::sync::Arc;

use tracing::warn;

use socialhub_database::repositories::ProfileRepository;

pub use friendship::FriendshipService;
pub use likes::LikeService;

/// Display name from the replicated profile, or a neutral fallback when the
/// profile has not arrived yet or cannot be read. Called after the write has
/// committed, so a lookup failure must not fail the request.
async fn display_name(profiles: &Arc<dyn ProfileRepository>, user_id: i64) -> String {
    let profile = match profiles.find(user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(user_id, error = %e, "Profile lookup failed, using fallback name");
            None
        }
    };
    profile
        .map(|p| format!("{} {}", p.first_name, p.last_name).trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("User {user_id}"))
}
