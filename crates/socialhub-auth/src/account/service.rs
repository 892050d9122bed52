//! Account flows: register, login, OAuth login, logout, password and profile changes.
//!
//! Every flow that changes profile data raises a user event through a
//! [`PendingEvents`] buffer that is committed only after the store write
//! succeeds.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use socialhub_core::config::AuthConfig;
use socialhub_core::error::AppError;
use socialhub_core::events::{DomainEvent, UserEventType};
use socialhub_core::result::AppResult;
use socialhub_database::repositories::AccountRepository;
use socialhub_entity::otp::{OtpStatus, OtpType};
use socialhub_entity::user::{NewAccount, UserAccount};
use socialhub_messaging::{DomainEventPublisher, PendingEvents};

use crate::oauth::OAuthProvider;
use crate::otp::OtpService;
use crate::password::PasswordHasher;
use crate::token::TokenService;

use super::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UpdateProfileRequest, check,
};

const BAD_CREDENTIALS: &str = "Invalid email or password";
const OAUTH_NOT_LINKED: &str = "Account is not linked to this OAuth identity";

/// Account flows of the auth service.
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    tokens: TokenService,
    otps: OtpService,
    hasher: PasswordHasher,
    publisher: DomainEventPublisher,
    default_roles: Vec<String>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("default_roles", &self.default_roles)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        tokens: TokenService,
        otps: OtpService,
        publisher: DomainEventPublisher,
        config: &AuthConfig,
    ) -> Self {
        Self {
            accounts,
            tokens,
            otps,
            hasher: PasswordHasher::new(),
            publisher,
            default_roles: config.default_roles.clone(),
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn otps(&self) -> &OtpService {
        &self.otps
    }

    /// Create a password account, announce it, and log it in.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        check(&request)?;
        let email = request.email.trim().to_lowercase();
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(format!("Email '{email}' is already registered")));
        }

        let password_hash = self.hasher.hash_password(&request.password)?;
        let account = self
            .accounts
            .create(
                NewAccount {
                    email,
                    password_hash: Some(password_hash),
                    first_name: request.first_name.trim().to_string(),
                    last_name: request.last_name.trim().to_string(),
                    phone_number: request.phone_number,
                    roles: self.default_roles.clone(),
                    provider: None,
                    provider_id: None,
                },
                Utc::now(),
            )
            .await?;

        self.announce(&account, UserEventType::UserCreated);
        info!(user_id = account.id, "Account registered");
        self.respond(account).await
    }

    /// Password login.
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        check(&request)?;
        let account = self
            .accounts
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::authentication(BAD_CREDENTIALS))?;

        let Some(hash) = account.password_hash.as_deref() else {
            return Err(AppError::authentication(BAD_CREDENTIALS));
        };
        if !self.hasher.verify_password(&request.password, hash)? {
            warn!(user_id = account.id, "Failed login attempt");
            return Err(AppError::authentication(BAD_CREDENTIALS));
        }

        info!(user_id = account.id, "Login succeeded");
        self.respond(account).await
    }

    /// Log in with a provider's user-info document, creating the account on
    /// first sight of the email.
    ///
    /// An existing account is only entered when it was created by the same
    /// provider for the same provider user id. A password account, or one
    /// linked to another provider identity, is never taken over by email.
    pub async fn oauth_login(
        &self,
        registration_id: &str,
        attributes: &serde_json::Value,
    ) -> AppResult<AuthResponse> {
        let provider = OAuthProvider::from_registration_id(registration_id)?;
        let info = provider.extract(attributes)?;

        if let Some(account) = self.accounts.find_by_email(&info.email).await? {
            let linked = account.provider.as_deref() == Some(provider.registration_id())
                && account.provider_id.as_deref() == Some(info.provider_id.as_str());
            if !linked {
                warn!(user_id = account.id, provider = %provider, "OAuth identity does not match the account");
                return Err(AppError::authentication(OAUTH_NOT_LINKED));
            }
            info!(user_id = account.id, provider = %provider, "OAuth login");
            return self.respond(account).await;
        }

        let account = self
            .accounts
            .create(
                NewAccount {
                    email: info.email,
                    password_hash: None,
                    first_name: info.first_name,
                    last_name: info.last_name,
                    phone_number: None,
                    roles: self.default_roles.clone(),
                    provider: Some(provider.registration_id().to_string()),
                    provider_id: Some(info.provider_id),
                },
                Utc::now(),
            )
            .await?;

        self.announce(&account, UserEventType::UserCreated);
        info!(user_id = account.id, provider = %provider, "Account created from OAuth login");
        self.respond(account).await
    }

    /// Revoke the presented token.
    pub async fn logout(&self, raw_token: &str) -> AppResult<()> {
        self.tokens.revoke(raw_token).await?;
        Ok(())
    }

    /// Revoke every token of the user.
    pub async fn logout_all(&self, user_id: i64) -> AppResult<u64> {
        self.tokens.revoke_all(user_id).await
    }

    /// Change password after checking the current one. Every existing token
    /// is revoked.
    pub async fn change_password(
        &self,
        user_id: i64,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        check(&request)?;
        let account = self.find(user_id).await?;
        let current_ok = match account.password_hash.as_deref() {
            Some(hash) => self.hasher.verify_password(&request.current_password, hash)?,
            None => false,
        };
        if !current_ok {
            return Err(AppError::authentication("Current password is incorrect"));
        }
        self.set_password(user_id, &request.new_password).await
    }

    /// Reset a forgotten password with a `PASSWORD_RESET` code.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> AppResult<()> {
        check(&request)?;
        let account = self
            .accounts
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::authentication("Invalid or expired code"))?;

        match self
            .otps
            .verify(&account.email, OtpType::PasswordReset, &request.code)
            .await?
        {
            OtpStatus::Verified => self.set_password(account.id, &request.new_password).await,
            _ => Err(AppError::authentication("Invalid or expired code")),
        }
    }

    /// Replace the public profile fields and announce the change.
    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<UserAccount> {
        check(&request)?;
        let account = self
            .accounts
            .update_profile(
                user_id,
                request.first_name.trim(),
                request.last_name.trim(),
                request.phone_number.as_deref(),
                Utc::now(),
            )
            .await?;
        self.announce(&account, UserEventType::UserUpdated);
        Ok(account)
    }

    pub async fn find(&self, user_id: i64) -> AppResult<UserAccount> {
        self.accounts
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    async fn set_password(&self, user_id: i64, password: &str) -> AppResult<()> {
        let hash = self.hasher.hash_password(password)?;
        self.accounts
            .update_password(user_id, &hash, Utc::now())
            .await?;
        let revoked = self.tokens.revoke_all(user_id).await?;
        info!(user_id, revoked, "Password changed");
        Ok(())
    }

    fn announce(&self, account: &UserAccount, event_type: UserEventType) {
        let mut events = PendingEvents::new();
        events.push(DomainEvent::UserChanged(account.to_event(event_type)));
        events.commit(&self.publisher);
    }

    async fn respond(&self, account: UserAccount) -> AppResult<AuthResponse> {
        let issued = self
            .tokens
            .issue(account.id, &account.email, &account.roles, None)
            .await?;
        Ok(AuthResponse {
            access_token: issued.access_token,
            token_type: "Bearer".to_string(),
            expires_at: issued.expires_at,
            user: account,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use socialhub_core::error::ErrorKind;
    use socialhub_core::events::UserEventPayload;
    use socialhub_database::memory::{
        MemoryAccountRepository, MemoryOtpRepository, MemoryTokenRepository,
    };
    use socialhub_messaging::MemoryBroker;

    struct Fixture {
        service: AuthService,
        broker: Arc<MemoryBroker>,
        _task: tokio::task::JoinHandle<()>,
    }

    fn fixture() -> Fixture {
        let config = AuthConfig::default();
        let broker = Arc::new(MemoryBroker::new(1, 64));
        let (publisher, task) = DomainEventPublisher::spawn(broker.clone(), 64);
        let service = AuthService::new(
            Arc::new(MemoryAccountRepository::new()),
            TokenService::new(Arc::new(MemoryTokenRepository::new()), &config),
            OtpService::new(Arc::new(MemoryOtpRepository::new()), &config),
            publisher,
            &config,
        );
        Fixture {
            service,
            broker,
            _task: task,
        }
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "password123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone_number: None,
        }
    }

    async fn user_events(broker: &MemoryBroker, expected: usize) -> Vec<UserEventPayload> {
        // Publishing is asynchronous; give the publisher task a moment.
        for _ in 0..50 {
            if broker.messages("user-events").await.len() >= expected {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        broker
            .messages("user-events")
            .await
            .iter()
            .map(|m| m.decode().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_register_issues_token_and_publishes_created() {
        let fx = fixture();
        let response = fx.service.register(register_request("Ada@Example.com")).await.unwrap();
        assert_eq!(response.user.email, "ada@example.com");
        assert_eq!(response.user.roles, vec!["USER".to_string()]);
        assert!(fx.service.tokens().validate(&response.access_token).await.valid);

        let events = user_events(&fx.broker, 1).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, UserEventType::UserCreated);
        assert_eq!(events[0].user_id, response.user.id);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let fx = fixture();
        fx.service.register(register_request("a@example.com")).await.unwrap();
        let err = fx.service.register(register_request("A@example.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_login() {
        let fx = fixture();
        fx.service.register(register_request("a@example.com")).await.unwrap();

        let ok = fx
            .service
            .login(LoginRequest {
                email: "a@example.com".into(),
                password: "password123".into(),
            })
            .await;
        assert!(ok.is_ok());

        let err = fx
            .service
            .login(LoginRequest {
                email: "a@example.com".into(),
                password: "wrong-password".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, BAD_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_change_password_revokes_tokens() {
        let fx = fixture();
        let registered = fx.service.register(register_request("a@example.com")).await.unwrap();
        let user_id = registered.user.id;

        fx.service
            .change_password(
                user_id,
                ChangePasswordRequest {
                    current_password: "password123".into(),
                    new_password: "new-password-456".into(),
                },
            )
            .await
            .unwrap();

        assert!(!fx.service.tokens().validate(&registered.access_token).await.valid);
        assert!(
            fx.service
                .login(LoginRequest {
                    email: "a@example.com".into(),
                    password: "new-password-456".into(),
                })
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_reset_password_with_code() {
        let fx = fixture();
        fx.service.register(register_request("a@example.com")).await.unwrap();
        let otp = fx
            .service
            .otps()
            .send("a@example.com", OtpType::PasswordReset)
            .await
            .unwrap();

        fx.service
            .reset_password(ResetPasswordRequest {
                email: "a@example.com".into(),
                code: otp.code.clone(),
                new_password: "reset-password-789".into(),
            })
            .await
            .unwrap();

        let reused = fx
            .service
            .reset_password(ResetPasswordRequest {
                email: "a@example.com".into(),
                code: otp.code,
                new_password: "another-password".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(reused.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_oauth_login_creates_once() {
        let fx = fixture();
        let attrs = json!({"sub": "g-1", "email": "g@example.com", "given_name": "Grace", "family_name": "Hopper"});
        let first = fx.service.oauth_login("google", &attrs).await.unwrap();
        let second = fx.service.oauth_login("google", &attrs).await.unwrap();
        assert_eq!(first.user.id, second.user.id);
        assert_eq!(first.user.provider.as_deref(), Some("google"));

        let err = fx.service.oauth_login("myspace", &attrs).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_oauth_login_never_enters_password_account() {
        let fx = fixture();
        let victim = fx.service.register(register_request("victim@example.com")).await.unwrap();

        let err = fx
            .service
            .oauth_login("google", &json!({"email": "victim@example.com", "sub": "attacker"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, OAUTH_NOT_LINKED);

        let account = fx.service.find(victim.user.id).await.unwrap();
        assert_eq!(account.provider, None);
    }

    #[tokio::test]
    async fn test_oauth_login_requires_same_provider_identity() {
        let fx = fixture();
        let attrs = json!({"sub": "g-1", "email": "g@example.com"});
        fx.service.oauth_login("google", &attrs).await.unwrap();

        let other_sub = fx
            .service
            .oauth_login("google", &json!({"sub": "g-2", "email": "g@example.com"}))
            .await
            .unwrap_err();
        assert_eq!(other_sub.kind, ErrorKind::Authentication);

        let other_provider = fx
            .service
            .oauth_login("github", &json!({"id": "g-1", "email": "g@example.com"}))
            .await
            .unwrap_err();
        assert_eq!(other_provider.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_update_profile_publishes_updated() {
        let fx = fixture();
        let registered = fx.service.register(register_request("a@example.com")).await.unwrap();
        let updated = fx
            .service
            .update_profile(
                registered.user.id,
                UpdateProfileRequest {
                    first_name: "Augusta".into(),
                    last_name: "King".into(),
                    phone_number: Some("555-0100".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Augusta");

        let events = user_events(&fx.broker, 2).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event_type, UserEventType::UserUpdated);
        assert!(events[1].updated_at.is_some());
    }
}
