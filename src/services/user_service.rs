//! User service - Handles user-related business logic.
//!
//! Email uniqueness and existence checks live here; the repository's unique
//! index backs the email check up under concurrency.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::deadline::within;
use crate::config::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::domain::{NewUser, Password, User, UserChanges, UserQuery};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user, hashing its password. `Conflict("email")` if taken.
    async fn store(&self, new_user: NewUser) -> AppResult<User>;

    /// Replace a user's profile. `created_at` and the password hash are kept.
    async fn update(&self, changes: UserChanges) -> AppResult<User>;

    /// Delete an existing user, `NotFound` otherwise
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn find(&self, id: Uuid) -> AppResult<User>;

    /// Page through users ordered by `created_at`, then `id`
    async fn find_all(&self, query: UserQuery) -> AppResult<Vec<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    timeout: Duration,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>, timeout: Duration) -> Self {
        Self { users, timeout }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn store(&self, new_user: NewUser) -> AppResult<User> {
        within(self.timeout, "store user", async move {
            if self.users.find_by_email(&new_user.email).await?.is_some() {
                return Err(AppError::Conflict("email"));
            }

            let password = Password::hash_blocking(new_user.password).await?;
            let now = Utc::now();

            let user = User {
                id: Uuid::new_v4(),
                email: new_user.email,
                phone: new_user.phone,
                gender: new_user.gender,
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                birth_date: new_user.birth_date,
                status: new_user.status,
                password_hash: password.into_string(),
                created_at: now,
                updated_at: now,
            };

            let stored = self.users.store(user).await?;
            tracing::info!(user_id = %stored.id, "User created");
            Ok(stored)
        })
        .await
    }

    async fn update(&self, changes: UserChanges) -> AppResult<User> {
        within(self.timeout, "update user", async move {
            let existing = self.users.find(changes.id).await?.ok_or_not_found("user")?;

            if let Some(owner) = self.users.find_by_email(&changes.email).await? {
                if owner.id != existing.id {
                    return Err(AppError::Conflict("email"));
                }
            }

            let user = User {
                id: existing.id,
                email: changes.email,
                phone: changes.phone,
                gender: changes.gender,
                first_name: changes.first_name,
                last_name: changes.last_name,
                birth_date: changes.birth_date,
                status: changes.status,
                password_hash: existing.password_hash,
                created_at: existing.created_at,
                updated_at: Utc::now(),
            };

            self.users.update(user).await
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        within(self.timeout, "delete user", async move {
            self.users.find(id).await?.ok_or_not_found("user")?;
            self.users.delete(id).await?;
            tracing::info!(user_id = %id, "User deleted");
            Ok(())
        })
        .await
    }

    async fn find(&self, id: Uuid) -> AppResult<User> {
        within(self.timeout, "find user", async move {
            self.users.find(id).await?.ok_or_not_found("user")
        })
        .await
    }

    async fn find_all(&self, mut query: UserQuery) -> AppResult<Vec<User>> {
        if query.limit == 0 {
            query.limit = DEFAULT_PAGE_LIMIT;
        }
        query.limit = query.limit.min(MAX_PAGE_LIMIT);

        within(self.timeout, "list users", self.users.find_all(query)).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        within(self.timeout, "find user by email", self.users.find_by_email(email)).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{eq, function};

    use super::*;
    use crate::domain::{Gender, UserFilter, UserStatus};
    use crate::infra::MockUserRepository;

    fn existing_user(id: Uuid, email: &str) -> User {
        let created = Utc::now() - chrono::Duration::days(30);
        User {
            id,
            email: email.to_string(),
            phone: None,
            gender: Some(Gender::Male),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            birth_date: None,
            status: UserStatus::Active,
            password_hash: "$argon2id$existing".to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            phone: Some("+6281234567890".to_string()),
            gender: Some(Gender::Female),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            birth_date: None,
            status: UserStatus::Active,
            password: "12345678".to_string(),
        }
    }

    fn changes(id: Uuid, email: &str) -> UserChanges {
        UserChanges {
            id,
            email: email.to_string(),
            phone: None,
            gender: Some(Gender::Male),
            first_name: "Johnny".to_string(),
            last_name: "Doe".to_string(),
            birth_date: None,
            status: UserStatus::Deactive,
        }
    }

    fn service(repo: MockUserRepository) -> UserManager {
        UserManager::new(Arc::new(repo), Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_store_hashes_password_and_stamps_times() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_store().times(1).returning(|user| Ok(user));

        let user = service(repo).store(new_user("jane@example.com")).await.unwrap();

        assert_eq!(user.email, "jane@example.com");
        assert_ne!(user.password_hash, "12345678");
        assert!(Password::from_hash(user.password_hash.clone()).verify("12345678"));
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_store_duplicate_email_conflicts() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(existing_user(Uuid::new_v4(), email))));
        repo.expect_store().never();

        let result = service(repo).store(new_user("taken@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict("email"))));
    }

    #[tokio::test]
    async fn test_store_propagates_lookup_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(AppError::internal("connection reset")));
        repo.expect_store().never();

        let result = service(repo).store(new_user("jane@example.com")).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_update_email_owned_by_other_user_conflicts() {
        let id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find()
            .with(eq(id))
            .returning(|id| Ok(Some(existing_user(id, "john@example.com"))));
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(existing_user(Uuid::new_v4(), email))));
        repo.expect_update().never();

        let result = service(repo).update(changes(id, "someone@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict("email"))));
    }

    #[tokio::test]
    async fn test_update_own_email_preserves_created_at() {
        let id = Uuid::new_v4();
        let original = existing_user(id, "john@example.com");
        let created_at = original.created_at;

        let mut repo = MockUserRepository::new();
        let found = original.clone();
        repo.expect_find().returning(move |_| Ok(Some(found.clone())));
        let owner = original.clone();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(owner.clone())));
        repo.expect_update()
            .with(function(move |user: &User| {
                user.created_at == created_at
                    && user.updated_at > created_at
                    && user.password_hash == "$argon2id$existing"
            }))
            .times(1)
            .returning(|user| Ok(user));

        let updated = service(repo).update(changes(id, "john@example.com")).await.unwrap();
        assert_eq!(updated.first_name, "Johnny");
        assert_eq!(updated.status, UserStatus::Deactive);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find().returning(|_| Ok(None));

        let result = service(repo).update(changes(Uuid::new_v4(), "x@example.com")).await;
        assert!(matches!(result, Err(AppError::NotFound("user"))));
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find().returning(|_| Ok(None));
        repo.expect_delete().never();

        let result = service(repo).delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound("user"))));
    }

    #[tokio::test]
    async fn test_delete_existing_user() {
        let id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find()
            .returning(|id| Ok(Some(existing_user(id, "john@example.com"))));
        repo.expect_delete().with(eq(id)).times(1).returning(|_| Ok(()));

        assert!(service(repo).delete(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_all_caps_limit() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_all()
            .with(function(|q: &UserQuery| q.limit == MAX_PAGE_LIMIT && q.offset == 5))
            .returning(|_| Ok(vec![]));

        let result = service(repo)
            .find_all(UserQuery {
                limit: 10_000,
                offset: 5,
                filter: UserFilter::default(),
            })
            .await;
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_zero_limit_uses_default() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_all()
            .with(function(|q: &UserQuery| q.limit == DEFAULT_PAGE_LIMIT))
            .returning(|_| Ok(vec![]));

        let result = service(repo)
            .find_all(UserQuery {
                limit: 0,
                offset: 0,
                filter: UserFilter::default(),
            })
            .await;
        assert!(result.is_ok());
    }
}
