//! Authentication service - Login, signup, logout and refresh-token rotation.
//!
//! Sessions have no explicit state: a refresh token is valid while its row
//! exists in the refresh-token store, and consumed once the row is gone.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::deadline::within;
use super::token::{AccessClaims, TokenIssuer, TokenPair};
use super::UserService;
use crate::domain::{parse_birth_date, Gender, NewUser, Password, RefreshToken, User, UserStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::RefreshTokenRepository;

/// Verified against when the email is unknown, so both login failure paths
/// cost one argon2 run with the default parameters. Matches no password.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$vjPAylZI3raWiK05sJw3RQ$uq4e7MTGe801hpggCDUJubMVAixzPlI8kzhUfU7X7vg";

/// Self-service registration fields, already shape-validated by the API layer.
#[derive(Clone)]
pub struct Registration {
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub first_name: String,
    pub last_name: String,
    /// Raw `YYYY-MM-DD` string
    pub birth_date: Option<String>,
    pub password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Successful login result
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and open a new session.
    ///
    /// Unknown email and wrong password both fail with
    /// `InvalidEmailOrPassword`.
    async fn login(&self, email: String, password: String) -> AppResult<LoginOutcome>;

    /// Register an active user
    async fn signup(&self, registration: Registration) -> AppResult<User>;

    /// End every session of `user_id`
    async fn logout(&self, user_id: Uuid) -> AppResult<()>;

    /// Exchange a stored, valid refresh token for a new pair. Single use.
    async fn refresh_token(&self, token: String) -> AppResult<TokenPair>;

    /// Verify an access token and extract its claims
    fn verify_access_token(&self, token: &str) -> AppResult<AccessClaims>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserService>,
    tokens: Arc<dyn RefreshTokenRepository>,
    issuer: Arc<TokenIssuer>,
    timeout: Duration,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserService>,
        tokens: Arc<dyn RefreshTokenRepository>,
        issuer: Arc<TokenIssuer>,
        timeout: Duration,
    ) -> Self {
        Self {
            users,
            tokens,
            issuer,
            timeout,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, email: String, password: String) -> AppResult<LoginOutcome> {
        within(self.timeout, "login", async move {
            let user = self.users.find_by_email(&email).await?;

            let stored = match &user {
                Some(user) => Password::from_hash(user.password_hash.clone()),
                None => Password::from_hash(DUMMY_HASH.to_string()),
            };
            let password_valid = stored.verify_blocking(password).await?;

            let user = match user {
                Some(user) if password_valid => user,
                _ => return Err(AppError::InvalidEmailOrPassword),
            };

            let tokens = self.issuer.issue_pair(user.id)?;
            self.tokens
                .store(RefreshToken::new(user.id, tokens.refresh.clone()))
                .await?;

            tracing::info!(user_id = %user.id, "User logged in");
            Ok(LoginOutcome { user, tokens })
        })
        .await
    }

    async fn signup(&self, registration: Registration) -> AppResult<User> {
        let birth_date = registration
            .birth_date
            .as_deref()
            .map(parse_birth_date)
            .transpose()?;

        self.users
            .store(NewUser {
                email: registration.email,
                phone: registration.phone,
                gender: registration.gender,
                first_name: registration.first_name,
                last_name: registration.last_name,
                birth_date,
                status: UserStatus::Active,
                password: registration.password,
            })
            .await
    }

    async fn logout(&self, user_id: Uuid) -> AppResult<()> {
        within(self.timeout, "logout", async move {
            let removed = self.tokens.delete_by_user_id(user_id).await?;
            tracing::info!(user_id = %user_id, sessions = removed, "User logged out");
            Ok(())
        })
        .await
    }

    async fn refresh_token(&self, token: String) -> AppResult<TokenPair> {
        within(self.timeout, "refresh token", async move {
            let stored = self
                .tokens
                .find(&token)
                .await?
                .ok_or_not_found("refresh token")?;

            if let Err(e) = self.issuer.verify_refresh(&token) {
                // An expired or tampered token is consumed on first sight
                self.tokens.delete(&token).await?;
                tracing::warn!(user_id = %stored.user_id, error = %e, "Rejected refresh token");
                return Err(AppError::bad_request(format!("refresh {}", e)));
            }

            let pair = self.issuer.issue_pair(stored.user_id)?;
            self.tokens
                .rotate(&token, RefreshToken::new(stored.user_id, pair.refresh.clone()))
                .await?;

            tracing::debug!(user_id = %stored.user_id, "Refresh token rotated");
            Ok(pair)
        })
        .await
    }

    fn verify_access_token(&self, token: &str) -> AppResult<AccessClaims> {
        Ok(self.issuer.verify_access(token)?)
    }
}
