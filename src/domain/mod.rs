//! Domain layer - Core business entities and logic
//!
//! Users, their credentials and the refresh-token sessions issued to them,
//! independent of storage and transport.

pub mod password;
pub mod refresh_token;
pub mod user;

pub use password::Password;
pub use refresh_token::RefreshToken;
pub use user::{
    parse_birth_date, Gender, NewUser, User, UserChanges, UserFilter, UserQuery, UserResponse,
    UserStatus,
};
