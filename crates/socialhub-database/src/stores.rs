//! Store bundle selected by configuration.

use std::sync::Arc;

use tracing::info;

use socialhub_core::config::{DatabaseConfig, DatabaseProvider};
use socialhub_core::result::AppResult;
use socialhub_entity::search::{CommentDocument, PostDocument, UserDocument};

use crate::connection::DatabasePool;
use crate::memory::{
    MemoryAccountRepository, MemoryFriendshipRepository, MemoryNotificationRepository,
    MemoryOtpRepository, MemoryProfileRepository, MemorySearchIndex, MemoryTokenRepository,
};
use crate::migration::run_migrations;
use crate::postgres::{
    PgAccountRepository, PgNotificationRepository, PgOtpRepository, PgTokenRepository,
};
use crate::repositories::{
    AccountRepository, FriendshipRepository, NotificationRepository, OtpRepository,
    ProfileRepository, SearchIndex, TokenRepository,
};

/// Every store the services use, behind their repository traits.
///
/// Projections (profiles, search indexes) and the friendship store are
/// always in memory; the relational stores follow `database.provider`.
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub otps: Arc<dyn OtpRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub friendships: Arc<dyn FriendshipRepository>,
    pub post_index: Arc<dyn SearchIndex<PostDocument>>,
    pub comment_index: Arc<dyn SearchIndex<CommentDocument>>,
    pub user_index: Arc<dyn SearchIndex<UserDocument>>,
    /// Present when the relational stores run on PostgreSQL.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// All stores in memory.
    pub fn in_memory() -> Self {
        Self {
            accounts: Arc::new(MemoryAccountRepository::new()),
            tokens: Arc::new(MemoryTokenRepository::new()),
            otps: Arc::new(MemoryOtpRepository::new()),
            notifications: Arc::new(MemoryNotificationRepository::new()),
            profiles: Arc::new(MemoryProfileRepository::new()),
            friendships: Arc::new(MemoryFriendshipRepository::new()),
            post_index: Arc::new(MemorySearchIndex::<PostDocument>::new()),
            comment_index: Arc::new(MemorySearchIndex::<CommentDocument>::new()),
            user_index: Arc::new(MemorySearchIndex::<UserDocument>::new()),
            pool: None,
        }
    }

    /// Build the stores for the configured provider, running migrations on PostgreSQL.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Memory => {
                info!("Using in-memory stores");
                Ok(Self::in_memory())
            }
            DatabaseProvider::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                run_migrations(pool.pool()).await?;
                let pg = pool.pool().clone();
                Ok(Self {
                    accounts: Arc::new(PgAccountRepository::new(pg.clone())),
                    tokens: Arc::new(PgTokenRepository::new(pg.clone())),
                    otps: Arc::new(PgOtpRepository::new(pg.clone())),
                    notifications: Arc::new(PgNotificationRepository::new(pg)),
                    pool: Some(pool),
                    ..Self::in_memory()
                })
            }
        }
    }
}
