//! Infrastructure layer - External systems integration
//!
//! Database connection, migrations and the repositories built on them.

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{RefreshTokenRepository, RefreshTokenStore, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockRefreshTokenRepository, MockUserRepository};
