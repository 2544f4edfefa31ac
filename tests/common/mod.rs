//! Shared fixtures for integration tests.
//!
//! In-memory repositories with the same atomicity guarantees as the
//! PostgreSQL ones: email uniqueness and token rotation are checked under a
//! single lock.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use account_service::domain::{RefreshToken, User, UserQuery};
use account_service::errors::{AppError, AppResult};
use account_service::infra::{RefreshTokenRepository, UserRepository};
use account_service::services::{
    AuthService, RefreshClaims, Registration, ServiceContainer, Services, TokenIssuer,
    UserService,
};

pub const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";
pub const PASSWORD: &str = "12345678";

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn store(&self, user: User) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("email"));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email && u.id != user.id) {
            return Err(AppError::Conflict("email"));
        }
        let existing = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(AppError::NotFound("user"))?;

        let updated = User {
            password_hash: existing.password_hash.clone(),
            created_at: existing.created_at,
            ..user
        };
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(AppError::NotFound("user"));
        }
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_all(&self, query: UserQuery) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| query.filter.matches(u))
            .cloned()
            .collect();
        users.sort_by_key(|u| (u.created_at, u.id));

        Ok(users
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryTokens {
    tokens: Mutex<HashMap<String, RefreshToken>>,
}

impl InMemoryTokens {
    pub fn count_for(&self, user_id: Uuid) -> usize {
        self.tokens
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.user_id == user_id)
            .count()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.lock().unwrap().contains_key(token)
    }

    /// Plant a token directly, bypassing login
    pub fn insert(&self, token: RefreshToken) {
        self.tokens.lock().unwrap().insert(token.token.clone(), token);
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryTokens {
    async fn store(&self, token: RefreshToken) -> AppResult<()> {
        self.insert(token);
        Ok(())
    }

    async fn find(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        Ok(self.tokens.lock().unwrap().get(token).cloned())
    }

    async fn delete(&self, token: &str) -> AppResult<()> {
        self.tokens.lock().unwrap().remove(token);
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> AppResult<u64> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|_, t| t.user_id != user_id);
        Ok((before - tokens.len()) as u64)
    }

    async fn rotate(&self, old: &str, new: RefreshToken) -> AppResult<()> {
        let mut tokens = self.tokens.lock().unwrap();
        if tokens.remove(old).is_none() {
            return Err(AppError::NotFound("refresh token"));
        }
        tokens.insert(new.token.clone(), new);
        Ok(())
    }
}

/// Services over fresh in-memory stores, plus handles to inspect them
pub struct TestApp {
    pub services: Services,
    pub users: Arc<InMemoryUsers>,
    pub tokens: Arc<InMemoryTokens>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUsers::default());
        let tokens = Arc::new(InMemoryTokens::default());
        let issuer = TokenIssuer::new(SECRET, "15m", "720h").unwrap();

        let services = Services::with_repositories(
            users.clone(),
            tokens.clone(),
            issuer,
            Duration::from_secs(30),
        );

        Self {
            services,
            users,
            tokens,
        }
    }

    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.services.auth()
    }

    pub fn user_service(&self) -> Arc<dyn UserService> {
        self.services.users()
    }

    pub async fn signup(&self, email: &str) -> User {
        self.auth().signup(registration(email)).await.unwrap()
    }
}

pub fn registration(email: &str) -> Registration {
    Registration {
        email: email.to_string(),
        phone: Some("+6281234567890".to_string()),
        gender: None,
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        birth_date: Some("1990-01-31".to_string()),
        password: PASSWORD.to_string(),
    }
}

/// A correctly signed refresh token that expired an hour ago
pub fn expired_refresh_token() -> String {
    let now = Utc::now().timestamp();
    let claims = RefreshClaims {
        jti: Uuid::new_v4(),
        iat: now - 7200,
        exp: now - 3600,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}
