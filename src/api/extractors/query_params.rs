//! Query string extractor that rejects with the API error envelope.

use axum::{
    async_trait,
    extract::{rejection::QueryRejection, FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// Like [`Query`], but a malformed query string is a `BadRequest`.
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| AppError::bad_request(e.body_text()))?;

        Ok(QueryParams(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;
    use crate::types::PaginationParams;

    async fn extract(uri: &str) -> Result<PaginationParams, AppError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        QueryParams::<PaginationParams>::from_request_parts(&mut parts, &())
            .await
            .map(|QueryParams(params)| params)
    }

    #[tokio::test]
    async fn test_well_formed_query_parses() {
        let params = extract("/api/user?limit=5&offset=2").await.unwrap();
        assert_eq!(params.limit(), 5);
        assert_eq!(params.offset(), 2);
    }

    #[tokio::test]
    async fn test_malformed_number_is_bad_request() {
        match extract("/api/user?limit=abc").await {
            Err(AppError::BadRequest(_)) => {}
            other => panic!("expected bad request, got {:?}", other.map(|p| p.limit())),
        }
    }
}
