//! Per-operation deadlines.

use std::future::Future;
use std::time::Duration;

use crate::errors::{AppError, AppResult};

/// Run `operation` under `limit`, surfacing expiry as [`AppError::Timeout`].
///
/// Expiry drops the future, which cancels any in-flight query and returns its
/// pooled connection.
pub async fn within<T, F>(limit: Duration, operation: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, timeout = ?limit, "Operation exceeded its deadline");
            Err(AppError::Timeout)
        }
    }
}
