//! User handlers.

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{QueryParams, ValidatedJson};
use crate::api::validation::{BIRTH_DATE_RE, GENDER_RE, PHONE_RE, STATUS_RE};
use crate::api::AppState;
use crate::domain::{
    parse_birth_date, Gender, NewUser, UserChanges, UserFilter, UserQuery, UserResponse,
    UserStatus,
};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, PaginationParams};

/// User creation request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateUserRequest {
    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(regex(path = *PHONE_RE, message = "must be a phone number"))]
    pub phone: Option<String>,
    #[validate(regex(path = *GENDER_RE, message = "must be male or female"))]
    #[schema(example = "female")]
    pub gender: Option<String>,
    #[validate(length(min = 2, max = 50, message = "must be 2 to 50 characters"))]
    pub first_name: String,
    #[validate(length(min = 2, max = 50, message = "must be 2 to 50 characters"))]
    pub last_name: String,
    #[validate(regex(path = *BIRTH_DATE_RE, message = "must be a date in YYYY-MM-DD format"))]
    #[schema(example = "1990-01-31")]
    pub birth_date: Option<String>,
    #[validate(regex(path = *STATUS_RE, message = "must be active or deactive"))]
    #[schema(example = "active")]
    pub status: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub password: String,
    #[validate(must_match(other = "password", message = "must match password"))]
    pub confirm_password: String,
}

/// User update request. Replaces every profile field; the password is not
/// changeable here.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "is required"))]
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(regex(path = *PHONE_RE, message = "must be a phone number"))]
    pub phone: Option<String>,
    #[validate(regex(path = *GENDER_RE, message = "must be male or female"))]
    pub gender: Option<String>,
    #[validate(length(min = 2, max = 50, message = "must be 2 to 50 characters"))]
    pub first_name: String,
    #[validate(length(min = 2, max = 50, message = "must be 2 to 50 characters"))]
    pub last_name: String,
    #[validate(regex(path = *BIRTH_DATE_RE, message = "must be a date in YYYY-MM-DD format"))]
    pub birth_date: Option<String>,
    #[validate(regex(path = *STATUS_RE, message = "must be active or deactive"))]
    pub status: String,
}

/// Exact-match list filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    /// `active` or `deactive`
    pub status: Option<String>,
    /// `male` or `female`
    pub gender: Option<String>,
    pub email: Option<String>,
}

impl UserFilterParams {
    fn into_filter(self) -> AppResult<UserFilter> {
        Ok(UserFilter {
            status: self.status.as_deref().map(str::parse).transpose()?,
            gender: self.gender.as_deref().map(str::parse).transpose()?,
            email: self.email,
        })
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user).put(update_user))
        .route("/:id", get(get_user).delete(delete_user))
}

/// Unparsable ids name no user
fn parse_user_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("user"))
}

fn parse_gender(raw: Option<&str>) -> AppResult<Option<Gender>> {
    raw.map(str::parse).transpose()
}

/// List users ordered by creation time
#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(PaginationParams, UserFilterParams),
    responses(
        (status = 200, description = "Page of users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid filter value")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<PaginationParams>,
    QueryParams(filter): QueryParams<UserFilterParams>,
) -> AppResult<ApiResponse<UserResponse>> {
    let users = state
        .user_service
        .find_all(UserQuery {
            limit: pagination.limit(),
            offset: pagination.offset(),
            filter: filter.into_filter()?,
        })
        .await?;

    Ok(ApiResponse::items(
        users.into_iter().map(UserResponse::from).collect(),
    ))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.find(parse_user_id(&id)?).await?;
    Ok(ApiResponse::data(UserResponse::from(user)))
}

/// Create a user with an explicit status
#[utoipa::path(
    post,
    path = "/api/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already exists"),
        (status = 422, description = "Validation error")
    )
)]
#[tracing::instrument(skip_all, fields(email = %payload.email))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .user_service
        .store(NewUser {
            gender: parse_gender(payload.gender.as_deref())?,
            birth_date: payload.birth_date.as_deref().map(parse_birth_date).transpose()?,
            status: payload.status.parse::<UserStatus>()?,
            email: payload.email,
            phone: payload.phone,
            first_name: payload.first_name,
            last_name: payload.last_name,
            password: payload.password,
        })
        .await?;

    Ok(ApiResponse::data(UserResponse::from(user)))
}

/// Replace a user's profile
#[utoipa::path(
    put,
    path = "/api/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email owned by another user"),
        (status = 422, description = "Validation error")
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %payload.id))]
pub async fn update_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .user_service
        .update(UserChanges {
            id: parse_user_id(&payload.id)?,
            gender: parse_gender(payload.gender.as_deref())?,
            birth_date: payload.birth_date.as_deref().map(parse_birth_date).transpose()?,
            status: payload.status.parse::<UserStatus>()?,
            email: payload.email,
            phone: payload.phone,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    Ok(ApiResponse::user(UserResponse::from(user)))
}

/// Delete user by ID
#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %id))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.delete(parse_user_id(&id)?).await?;
    Ok(ApiResponse::ok())
}
