//! Authentication handlers.

use axum::{
    extract::{Extension, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::validation::{BIRTH_DATE_RE, GENDER_RE, PHONE_RE};
use crate::api::AppState;
use crate::domain::{Gender, UserResponse};
use crate::errors::AppResult;
use crate::services::Registration;
use crate::types::{ApiResponse, TokenResponse};

/// User registration request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(regex(path = *PHONE_RE, message = "must be a phone number"))]
    #[schema(example = "+6281234567890")]
    pub phone: Option<String>,
    #[validate(regex(path = *GENDER_RE, message = "must be male or female"))]
    #[schema(example = "male")]
    pub gender: Option<String>,
    #[validate(length(min = 2, max = 50, message = "must be 2 to 50 characters"))]
    #[schema(example = "John")]
    pub first_name: String,
    #[validate(length(min = 2, max = 50, message = "must be 2 to 50 characters"))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[validate(regex(path = *BIRTH_DATE_RE, message = "must be a date in YYYY-MM-DD format"))]
    #[schema(example = "1990-01-31")]
    pub birth_date: Option<String>,
    /// Minimum 8 characters
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(must_match(other = "password", message = "must match password"))]
    #[schema(example = "SecurePass123!")]
    pub confirm_password: String,
}

/// User login request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Refresh token exchange request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub token: String,
}

/// Create authentication routes. Logout is mounted separately, behind auth.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
}

/// Routes that need a verified access token
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/logout", get(logout))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User registered successfully", body = UserResponse),
        (status = 409, description = "Email already exists"),
        (status = 422, description = "Validation error")
    )
)]
#[tracing::instrument(skip_all, fields(email = %payload.email))]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let gender = payload
        .gender
        .as_deref()
        .map(str::parse::<Gender>)
        .transpose()?;

    let user = state
        .auth_service
        .signup(Registration {
            email: payload.email,
            phone: payload.phone,
            gender,
            first_name: payload.first_name,
            last_name: payload.last_name,
            birth_date: payload.birth_date,
            password: payload.password,
        })
        .await?;

    Ok(ApiResponse::data(UserResponse::from(user)))
}

/// Login and get a token pair
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 422, description = "Validation error")
    )
)]
#[tracing::instrument(skip_all, fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let outcome = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(ApiResponse::data(UserResponse::from(outcome.user)).with_token(outcome.tokens))
}

/// Exchange a refresh token for a new pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh-token",
    tag = "Authentication",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenResponse),
        (status = 400, description = "Refresh token expired or malformed"),
        (status = 404, description = "Refresh token unknown or already used")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<ApiResponse<()>> {
    let tokens = state.auth_service.refresh_token(payload.token).await?;
    Ok(ApiResponse::token(tokens))
}

/// End every session of the current user
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Unauthorized")
    )
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn logout(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.auth_service.logout(current_user.id).await?;
    Ok(ApiResponse::ok())
}
