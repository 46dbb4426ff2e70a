//! Booking handlers: quote, payment hand-off and confirmation.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{
    ConfirmedOrderDto, DataResponse, PaymentRequest, PaymentUrlDto, QuoteRequest, QuoteResponse,
};
use crate::api::extract::RequestingUser;
use crate::app_state::AppState;
use crate::domain::BookingToken;
use crate::error::{BookingError, ErrorResponse};

/// `POST /orders/info` — Quote a booking.
///
/// # Errors
///
/// Returns [`BookingError`] on validation, catalog or collaborator failure.
#[utoipa::path(
    post,
    path = "/api/v1/orders/info",
    tag = "Orders",
    summary = "Quote a booking",
    description = "Validates the requested slot, picks a free barber and prices the hair style and optional hair color. `data` is null when no barber is free.",
    request_body = QuoteRequest,
    params(
        ("x-user-id" = i32, Header, description = "Requesting user id"),
    ),
    responses(
        (status = 200, description = "Quote, or null when nobody is free", body = QuoteResponse),
        (status = 400, description = "Invalid date, time, slot or catalog item", body = ErrorResponse),
        (status = 401, description = "Missing user", body = ErrorResponse),
    )
)]
pub async fn quote(
    State(state): State<AppState>,
    RequestingUser(user): RequestingUser,
    Json(req): Json<QuoteRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let request = req.into_booking(user);
    let quote = state.booking_service.quote(&request).await?;
    Ok(Json(QuoteResponse { data: quote }))
}

/// `POST /orders/payment` — Stage a booking and start payment.
///
/// # Errors
///
/// Returns [`BookingError`] on an unknown payment type, when no barber is
/// free, or on any failure [`quote`] can return.
#[utoipa::path(
    post,
    path = "/api/v1/orders/payment",
    tag = "Orders",
    summary = "Start payment for a booking",
    description = "Recomputes the quote, stages it for 30 minutes under a fresh token and returns the payment provider's redirect URL.",
    request_body = PaymentRequest,
    params(
        ("x-user-id" = i32, Header, description = "Requesting user id"),
    ),
    responses(
        (status = 200, description = "Payment redirect", body = DataResponse<PaymentUrlDto>),
        (status = 400, description = "Invalid request or payment type", body = ErrorResponse),
        (status = 409, description = "No barber free at the slot", body = ErrorResponse),
        (status = 503, description = "A collaborator did not answer in time", body = ErrorResponse),
    )
)]
pub async fn payment(
    State(state): State<AppState>,
    RequestingUser(user): RequestingUser,
    Json(req): Json<PaymentRequest>,
) -> Result<impl IntoResponse, BookingError> {
    let request = req.booking.into_booking(user);
    let handoff = state
        .booking_service
        .stage_payment(&request, &req.payment_type)
        .await?;
    Ok(Json(DataResponse::new(PaymentUrlDto {
        payment_url: handoff.payment_url,
    })))
}

/// `POST /orders/confirm/{token}` — Persist a paid booking.
///
/// # Errors
///
/// Returns [`BookingError::InvalidToken`] for a malformed token,
/// [`BookingError::StagedBookingNotFound`] for an unknown or expired one, or
/// a persistence error.
#[utoipa::path(
    post,
    path = "/api/v1/orders/confirm/{token}",
    tag = "Orders",
    summary = "Confirm a paid booking",
    description = "Turns the booking staged under `token` into an order. Confirming the same token again returns the same order id.",
    params(
        ("token" = String, Path, description = "Booking token issued at payment"),
    ),
    responses(
        (status = 200, description = "Order created", body = DataResponse<ConfirmedOrderDto>),
        (status = 400, description = "Malformed token", body = ErrorResponse),
        (status = 404, description = "Nothing staged under the token", body = ErrorResponse),
    )
)]
pub async fn confirm(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, BookingError> {
    let token: BookingToken = token.parse()?;
    let order_id = state.confirmation.confirm(token).await?;
    Ok(Json(DataResponse::new(ConfirmedOrderDto { order_id })))
}

/// Booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders/info", post(quote))
        .route("/orders/payment", post(payment))
        .route("/orders/confirm/{token}", post(confirm))
}
