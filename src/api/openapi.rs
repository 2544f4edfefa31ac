//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, user_handler};
use crate::domain::{Gender, UserResponse, UserStatus};
use crate::types::TokenResponse;

/// OpenAPI documentation for the account service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account Service",
        version = "0.1.0",
        description = "User accounts with signup, login and refresh-token rotation"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::signup,
        auth_handler::login,
        auth_handler::refresh_token,
        auth_handler::logout,
        // User endpoints
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
    ),
    components(
        schemas(
            // Domain types
            UserResponse,
            UserStatus,
            Gender,
            // Auth types
            auth_handler::SignupRequest,
            auth_handler::LoginRequest,
            auth_handler::RefreshTokenRequest,
            TokenResponse,
            // User handler types
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup, login and session management"),
        (name = "Users", description = "User management operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
