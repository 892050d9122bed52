//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use socialhub_auth::{
    AuthService, LocalTokenValidator, OAuthUserInfoClient, OtpService, RemoteTokenValidator,
    TokenService, TokenValidator,
};
use socialhub_consumer::{FriendshipService, LikeService, NotificationService};
use socialhub_core::config::AppConfig;
use socialhub_core::result::AppResult;
use socialhub_database::Stores;
use socialhub_messaging::DomainEventPublisher;
use socialhub_realtime::PresenceRegistry;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Every field is cheap
/// to clone.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,
    pub started_at: DateTime<Utc>,

    // ── Infrastructure ───────────────────────────────────────
    pub stores: Stores,
    pub publisher: DomainEventPublisher,

    // ── Auth ─────────────────────────────────────────────────
    /// Account flows; also owns the token and OTP services
    pub auth: AuthService,
    /// Provider user-info lookups for OAuth login
    pub oauth: OAuthUserInfoClient,
    /// Validator consulted by the gateway and service filters
    pub validator: Arc<dyn TokenValidator>,

    // ── Services ─────────────────────────────────────────────
    pub notifications: NotificationService,
    pub friendships: FriendshipService,
    pub likes: LikeService,

    // ── Realtime ─────────────────────────────────────────────
    pub presence: Arc<PresenceRegistry>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("started_at", &self.started_at)
            .field("sessions", &self.presence.session_count())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire every service over the given stores and publisher.
    ///
    /// With `gateway.local_validation` the filters validate in-process;
    /// otherwise they call the auth service's validation endpoint.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        publisher: DomainEventPublisher,
    ) -> AppResult<Self> {
        let tokens = TokenService::new(stores.tokens.clone(), &config.auth);
        let otps = OtpService::new(stores.otps.clone(), &config.auth);

        let validator: Arc<dyn TokenValidator> = if config.gateway.local_validation {
            Arc::new(LocalTokenValidator::new(tokens.clone()))
        } else {
            let remote = RemoteTokenValidator::new(&config.gateway)?;
            tracing::info!(url = %remote.url(), "Validating tokens through the auth service");
            Arc::new(remote)
        };

        let oauth = OAuthUserInfoClient::new(&config.auth.oauth)?;
        let auth = AuthService::new(
            stores.accounts.clone(),
            tokens,
            otps,
            publisher.clone(),
            &config.auth,
        );
        let notifications =
            NotificationService::new(stores.notifications.clone(), &config.notification);
        let friendships = FriendshipService::new(
            stores.friendships.clone(),
            stores.profiles.clone(),
            publisher.clone(),
        );
        let likes = LikeService::new(stores.profiles.clone(), publisher.clone());

        Ok(Self {
            config: Arc::new(config),
            started_at: Utc::now(),
            stores,
            publisher,
            auth,
            oauth,
            validator,
            notifications,
            friendships,
            likes,
            presence: Arc::new(PresenceRegistry::new()),
        })
    }

    /// Replace the token validator.
    pub fn with_validator(mut self, validator: Arc<dyn TokenValidator>) -> Self {
        self.validator = validator;
        self
    }
}
