//! Pagination types for list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_OFFSET, MAX_PAGE_LIMIT};

/// `limit`/`offset` query parameters
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page size, 10 when absent or zero, at most 100
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default = "default_offset")]
    pub offset: u64,
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

fn default_offset() -> u64 {
    DEFAULT_PAGE_OFFSET
}

impl PaginationParams {
    /// Get limit defaulted and capped at maximum
    pub fn limit(&self) -> u64 {
        match self.limit {
            0 => DEFAULT_PAGE_LIMIT,
            limit => limit.min(MAX_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: DEFAULT_PAGE_OFFSET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_and_caps() {
        let params = |limit| PaginationParams { limit, offset: 0 };
        assert_eq!(params(0).limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(params(25).limit(), 25);
        assert_eq!(params(5_000).limit(), MAX_PAGE_LIMIT);
    }
}
