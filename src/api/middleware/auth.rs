//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::errors::AppError;
use crate::services::extract_bearer;

/// Authenticated user extracted from the access token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
}

/// JWT authentication middleware.
///
/// Extracts and validates the access token from the Authorization header,
/// then injects the CurrentUser into the request extensions. A missing,
/// malformed or expired token is a plain 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let claims = state
        .auth_service
        .verify_access_token(extract_bearer(auth_header))
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AppError::Unauthorized
        })?;

    request
        .extensions_mut()
        .insert(CurrentUser { id: claims.sub });

    Ok(next.run(request).await)
}
