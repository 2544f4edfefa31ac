//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on repository traits, never on
//! SeaORM directly, and every operation runs under the request deadline.

mod auth_service;
pub mod container;
mod deadline;
pub mod token;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, LoginOutcome, Registration};
pub use user_service::{UserManager, UserService};

// Tokens
pub use token::{extract_bearer, AccessClaims, RefreshClaims, TokenError, TokenIssuer, TokenPair};

#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
