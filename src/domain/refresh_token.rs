//! Refresh token session record.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored refresh token. The row exists until the token is rotated or the
/// owner logs out.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub user_id: Uuid,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn new(user_id: Uuid, token: String) -> Self {
        Self {
            user_id,
            token,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshToken")
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}
