//! Shared HTTP types.

mod pagination;
mod response;

pub use pagination::PaginationParams;
pub use response::{ApiResponse, TokenResponse};
