//! Repository layer - Data access abstraction
//!
//! Services depend on the traits; the SeaORM stores are wired once at startup.

pub(crate) mod entities;
mod refresh_token_repository;
mod user_repository;

pub use refresh_token_repository::{RefreshTokenRepository, RefreshTokenStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use refresh_token_repository::MockRefreshTokenRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
