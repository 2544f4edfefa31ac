use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::TOKEN_TYPE_BEARER;
use crate::services::TokenPair;

const STATUS_SUCCESS: &str = "success";

/// Standard API response envelope.
///
/// Only the populated keys are serialized, so one type covers `{status}`,
/// `{status, data}`, `{status, items}`, `{status, user}` and the token variants.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenResponse>,
}

impl<T: Serialize> ApiResponse<T> {
    fn empty() -> Self {
        Self {
            status: STATUS_SUCCESS,
            data: None,
            items: None,
            user: None,
            token: None,
        }
    }

    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::empty()
        }
    }

    pub fn items(items: Vec<T>) -> Self {
        Self {
            items: Some(items),
            ..Self::empty()
        }
    }

    pub fn user(user: T) -> Self {
        Self {
            user: Some(user),
            ..Self::empty()
        }
    }

    pub fn with_token(mut self, tokens: TokenPair) -> Self {
        self.token = Some(TokenResponse::from(tokens));
        self
    }
}

impl ApiResponse<()> {
    /// Bare `{"status": "success"}`
    pub fn ok() -> Self {
        Self::empty()
    }

    pub fn token(tokens: TokenPair) -> Self {
        Self::empty().with_token(tokens)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Token pair as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    #[serde(rename = "type")]
    #[schema(example = "Bearer")]
    pub token_type: &'static str,
    pub access: String,
    pub refresh: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(tokens: TokenPair) -> Self {
        Self {
            token_type: TOKEN_TYPE_BEARER,
            access: tokens.access,
            refresh: tokens.refresh,
        }
    }
}
