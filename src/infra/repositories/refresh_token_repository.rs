//! Refresh token repository - issued refresh tokens keyed by value and owner.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ColumnTrait, DatabaseConnection, EntityTrait, IsolationLevel, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::entities::refresh_token::{self, ActiveModel, Entity as RefreshTokenEntity};
use crate::domain::RefreshToken;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn store(&self, token: RefreshToken) -> AppResult<()>;

    async fn find(&self, token: &str) -> AppResult<Option<RefreshToken>>;

    /// Delete a single token. Deleting an absent token is not an error.
    async fn delete(&self, token: &str) -> AppResult<()>;

    /// Delete every token owned by `user_id`, returning how many were removed
    async fn delete_by_user_id(&self, user_id: Uuid) -> AppResult<u64>;

    /// Consume `old` and persist `new` atomically.
    ///
    /// Fails with `NotFound("refresh token")` and stores nothing when `old`
    /// was already consumed, so of two concurrent redemptions exactly one wins.
    async fn rotate(&self, old: &str, new: RefreshToken) -> AppResult<()>;
}

/// Concrete implementation of RefreshTokenRepository
pub struct RefreshTokenStore {
    db: Arc<DatabaseConnection>,
}

impl RefreshTokenStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_active_model(token: RefreshToken) -> ActiveModel {
    ActiveModel {
        token: Set(token.token),
        user_id: Set(token.user_id),
        created_at: Set(token.created_at),
    }
}

#[async_trait]
impl RefreshTokenRepository for RefreshTokenStore {
    async fn store(&self, token: RefreshToken) -> AppResult<()> {
        RefreshTokenEntity::insert(to_active_model(token))
            .exec_without_returning(&*self.db)
            .await
            .map_err(|e| AppError::repository("store refresh token", e))?;

        Ok(())
    }

    async fn find(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        let result = RefreshTokenEntity::find_by_id(token.to_owned())
            .one(&*self.db)
            .await
            .map_err(|e| AppError::repository("find refresh token", e))?;

        Ok(result.map(RefreshToken::from))
    }

    async fn delete(&self, token: &str) -> AppResult<()> {
        RefreshTokenEntity::delete_by_id(token.to_owned())
            .exec(&*self.db)
            .await
            .map_err(|e| AppError::repository("delete refresh token", e))?;

        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> AppResult<u64> {
        let result = RefreshTokenEntity::delete_many()
            .filter(refresh_token::Column::UserId.eq(user_id))
            .exec(&*self.db)
            .await
            .map_err(|e| AppError::repository("delete refresh tokens by user", e))?;

        Ok(result.rows_affected)
    }

    async fn rotate(&self, old: &str, new: RefreshToken) -> AppResult<()> {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await
            .map_err(|e| AppError::repository("begin refresh token rotation", e))?;

        // The row lock taken by this DELETE serializes concurrent redemptions;
        // the loser sees zero affected rows once the winner commits.
        let deleted = RefreshTokenEntity::delete_by_id(old.to_owned())
            .exec(&txn)
            .await
            .map_err(|e| AppError::repository("consume refresh token", e))?;

        if deleted.rows_affected != 1 {
            if let Err(e) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", e);
            }
            return Err(AppError::NotFound("refresh token"));
        }

        RefreshTokenEntity::insert(to_active_model(new))
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::repository("store rotated refresh token", e))?;

        txn.commit()
            .await
            .map_err(|e| AppError::repository("commit refresh token rotation", e))
    }
}
