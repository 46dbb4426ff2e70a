//! Order query parameters.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query string of `GET /orders`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Items per page; at most 100 are returned. Defaults to 10.
    pub items: Option<u32>,
    /// Page number (1-indexed). Defaults to 1.
    pub page: Option<u32>,
    /// `asc` or `desc` on order time. Defaults to `desc`.
    pub sort_by: Option<String>,
    /// Order code (`BBSOD<id>`) or free text.
    pub code_or_hair_style: Option<String>,
}
