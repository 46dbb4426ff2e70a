//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope: `{ "data": ... }`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DataResponse<T> {
    /// Response payload.
    pub data: T,
}

impl<T> DataResponse<T> {
    /// Wraps `data` in the envelope.
    pub const fn new(data: T) -> Self {
        Self { data }
    }
}

/// Pagination of list endpoints, as requested.
///
/// Values are kept as sent; the service bounds the page it actually queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    /// Items per page. Defaults to 10.
    pub items: u32,
    /// Page number (1-indexed). Defaults to 1.
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_items() -> u32 {
    10
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            items: default_items(),
            page: default_page(),
        }
    }
}

impl PaginationParams {
    /// Applies defaults to absent query values.
    #[must_use]
    pub fn from_query(items: Option<u32>, page: Option<u32>) -> Self {
        Self {
            items: items.unwrap_or_else(default_items),
            page: page.unwrap_or_else(default_page),
        }
    }
}
