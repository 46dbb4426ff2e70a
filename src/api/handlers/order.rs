//! Order read handlers: detail and paginated list.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{DataResponse, ListOrdersParams, PaginationParams};
use crate::api::extract::RequestingUser;
use crate::app_state::AppState;
use crate::domain::{EnrichedOrder, OrderSummary, Page};
use crate::error::{BookingError, ErrorResponse};
use crate::service::ListOrdersRequest;

/// `GET /orders/{id}` — Get one order.
///
/// # Errors
///
/// Returns [`BookingError::InvalidId`] for a malformed id,
/// [`BookingError::OrderNotFound`] if the order does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    summary = "Get order details",
    description = "Returns a confirmed order joined with its payment. The barber avatar is the directory's current one.",
    params(
        ("id" = String, Path, description = "Positive integer order id"),
        ("x-user-id" = i32, Header, description = "Requesting user id"),
    ),
    responses(
        (status = 200, description = "Order details", body = DataResponse<EnrichedOrder>),
        (status = 400, description = "Malformed order id", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    RequestingUser(user): RequestingUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, BookingError> {
    let order = state.order_query.get_order(&id, user).await?;
    Ok(Json(DataResponse::new(order)))
}

/// `GET /orders` — List the user's orders.
///
/// # Errors
///
/// Returns [`BookingError::InvalidSortBy`] for a sort other than `asc` or
/// `desc`.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    summary = "List orders",
    description = "Returns one page of the user's orders sorted on order time. A `codeOrHairStyle` of the form `BBSOD<id>` restricts the list to that order.",
    params(
        ListOrdersParams,
        ("x-user-id" = i32, Header, description = "Requesting user id"),
    ),
    responses(
        (status = 200, description = "Page of order summaries", body = Page<OrderSummary>),
        (status = 400, description = "Invalid sort direction", body = ErrorResponse),
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    RequestingUser(user): RequestingUser,
    Query(params): Query<ListOrdersParams>,
) -> Result<impl IntoResponse, BookingError> {
    let pagination = PaginationParams::from_query(params.items, params.page);
    let request = ListOrdersRequest {
        user,
        items: pagination.items,
        page: pagination.page,
        sort_by: params.sort_by,
        code_or_hair_style: params.code_or_hair_style,
    };
    let page = state.order_query.list_orders(&request).await?;
    Ok(Json(page))
}

/// Order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
}
