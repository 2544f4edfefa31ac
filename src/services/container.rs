//! Service Container - Wires repositories, token issuer and services together.
//!
//! Handlers only see the service traits; this is the one place that knows
//! which concrete implementations back them.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use super::token::TokenIssuer;
use super::{AuthService, Authenticator, UserManager, UserService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{RefreshTokenRepository, RefreshTokenStore, UserRepository, UserStore};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Build every service on top of the given repositories.
    ///
    /// `timeout` bounds each service operation.
    pub fn with_repositories(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn RefreshTokenRepository>,
        issuer: TokenIssuer,
        timeout: Duration,
    ) -> Self {
        let user_service: Arc<dyn UserService> = Arc::new(UserManager::new(users, timeout));
        let auth_service = Arc::new(Authenticator::new(
            user_service.clone(),
            tokens,
            Arc::new(issuer),
            timeout,
        ));

        Self {
            auth_service,
            user_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: Arc<DatabaseConnection>, config: &Config) -> AppResult<Self> {
        let issuer = TokenIssuer::new(
            config.jwt_secret_bytes(),
            &config.jwt_access_ttl,
            &config.jwt_refresh_ttl,
        )?;

        Ok(Self::with_repositories(
            Arc::new(UserStore::new(Arc::clone(&db))),
            Arc::new(RefreshTokenStore::new(db)),
            issuer,
            config.request_timeout,
        ))
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
