//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{AuthService, ServiceContainer, Services, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Database handle for health checks, absent when services are injected
    pub database: Option<Arc<Database>>,
    /// Whether `/api/user` requires a bearer token
    pub protect_user_routes: bool,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        let container = Services::from_connection(database.get_connection(), config)?;

        Ok(Self {
            auth_service: container.auth(),
            user_service: container.users(),
            database: Some(database),
            protect_user_routes: config.user_routes_require_auth,
        })
    }

    /// Create new application state with manually injected services.
    pub fn new(services: &dyn ServiceContainer, protect_user_routes: bool) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            database: None,
            protect_user_routes,
        }
    }
}
