//! User repository - SeaORM-backed persistence of user records.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{User, UserQuery};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User persistence capabilities the services depend on.
///
/// `store` and `update` surface a duplicate email as `Conflict("email")`;
/// the unique index is the authoritative check.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn store(&self, user: User) -> AppResult<User>;

    /// Overwrite profile fields and `updated_at`; password and `created_at` are left alone
    async fn update(&self, user: User) -> AppResult<User>;

    /// Delete by ID, `NotFound` if nothing was deleted
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn find(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Filtered page ordered by `created_at`, then `id`
    async fn find_all(&self, query: UserQuery) -> AppResult<Vec<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_active_model(user: &User) -> ActiveModel {
    ActiveModel {
        id: Set(user.id),
        email: Set(user.email.clone()),
        phone: Set(user.phone.clone()),
        gender: Set(user.gender.map(|g| g.as_str().to_string())),
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        birth_date: Set(user.birth_date),
        status: Set(user.status.as_str().to_string()),
        password: Set(user.password_hash.clone()),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn store(&self, user: User) -> AppResult<User> {
        let model = to_active_model(&user)
            .insert(&*self.db)
            .await
            .map_err(|e| AppError::repository_unique("store user", "email", e))?;

        Ok(User::from(model))
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut active = to_active_model(&user);
        active.password = NotSet;
        active.created_at = NotSet;

        let model = active.update(&*self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => AppError::NotFound("user"),
            e => AppError::repository_unique("update user", "email", e),
        })?;

        Ok(User::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(|e| AppError::repository("delete user", e))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("user"));
        }

        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(|e| AppError::repository("find user", e))?;

        Ok(result.map(User::from))
    }

    async fn find_all(&self, query: UserQuery) -> AppResult<Vec<User>> {
        let mut select = UserEntity::find();

        if let Some(status) = query.filter.status {
            select = select.filter(user::Column::Status.eq(status.as_str()));
        }
        if let Some(gender) = query.filter.gender {
            select = select.filter(user::Column::Gender.eq(gender.as_str()));
        }
        if let Some(email) = query.filter.email {
            select = select.filter(user::Column::Email.eq(email));
        }

        let users = select
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .limit(query.limit)
            .offset(query.offset)
            .all(&*self.db)
            .await
            .map_err(|e| AppError::repository("list users", e))?;

        Ok(users.into_iter().map(User::from).collect())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(|e| AppError::repository("find user by email", e))?;

        Ok(result.map(User::from))
    }
}
