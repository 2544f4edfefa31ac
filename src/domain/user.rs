//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    BIRTH_DATE_FORMAT, GENDER_FEMALE, GENDER_MALE, STATUS_ACTIVE, STATUS_DEACTIVE,
};
use crate::errors::{AppError, AppResult};

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Deactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => STATUS_ACTIVE,
            UserStatus::Deactive => STATUS_DEACTIVE,
        }
    }
}

impl FromStr for UserStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_ACTIVE => Ok(UserStatus::Active),
            STATUS_DEACTIVE => Ok(UserStatus::Deactive),
            _ => Err(AppError::field("status", "must be one of: active, deactive")),
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => GENDER_MALE,
            Gender::Female => GENDER_FEMALE,
        }
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            GENDER_MALE => Ok(Gender::Male),
            GENDER_FEMALE => Ok(Gender::Female),
            _ => Err(AppError::field("gender", "must be one of: male, female")),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a birth date in `YYYY-MM-DD` form.
///
/// # Errors
/// Returns a `birth_date` validation error for anything else.
pub fn parse_birth_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, BIRTH_DATE_FORMAT)
        .map_err(|_| AppError::field("birth_date", "must be a date in YYYY-MM-DD format"))
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub status: UserStatus,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Data needed to create a user. The password is still plain text here.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub status: UserStatus,
    pub password: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("status", &self.status)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Full replacement of a user's profile fields. Password and timestamps are
/// owned by the service.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub status: UserStatus,
}

/// Exact-match filters for listing users
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub status: Option<UserStatus>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.status.map_or(true, |s| user.status == s)
            && self.gender.map_or(true, |g| user.gender == Some(g))
            && self.email.as_ref().map_or(true, |e| &user.email == e)
    }
}

/// Paged list query. Results are ordered by `created_at`, then `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserQuery {
    pub limit: u64,
    pub offset: u64,
    pub filter: UserFilter,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "+6281234567890")]
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(value_type = Option<String>, example = "1990-01-31")]
    pub birth_date: Option<NaiveDate>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            phone: user.phone,
            gender: user.gender,
            first_name: user.first_name,
            last_name: user.last_name,
            birth_date: user.birth_date,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
