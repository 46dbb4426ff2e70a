//! Booking error types with HTTP status code mapping.
//!
//! [`BookingError`] is the central error type for the service. Each variant
//! maps to an [`ErrorCategory`], a numeric error code and an HTTP status, and
//! renders as the list-shaped field error envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::clients::CollaboratorError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "code": 1003,
///   "errors": [
///     { "field": "time", "message": "Invalid time slot", "resource": "BookingRequest" }
///   ]
/// }
/// ```
///
/// The list always holds exactly one entry: validation stops at the first
/// violated rule.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Numeric error code (see code ranges on [`BookingError`]).
    pub code: u32,
    /// Field level errors.
    pub errors: Vec<FieldError>,
}

/// One field level error entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Offending field(s), e.g. `"date; time"`.
    pub field: String,
    /// Human-readable message.
    pub message: String,
    /// Request or resource the field belongs to.
    pub resource: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>, resource: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            resource: resource.to_string(),
        }
    }
}

/// Failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or out-of-policy input, correctable by the caller.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// A collaborator call failed, was rejected or timed out.
    Gateway,
    /// An invariant the service itself guarantees was violated.
    Integrity,
    /// Any other server-side failure.
    Server,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category                     | HTTP Status                    |
/// |-----------|------------------------------|--------------------------------|
/// | 1000–1999 | Validation                   | 400 Bad Request / 409 Conflict |
/// | 2000–2999 | Not Found                    | 404 Not Found                  |
/// | 3000–3999 | Server / Gateway / Integrity | 500 / 502 / 503                |
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// The date and time could not be parsed.
    #[error("invalid date and time")]
    InvalidDateTime,

    /// The requested timestamp lies outside the booking window.
    #[error("date and time out of the booking window")]
    OutOfRange,

    /// The requested time is not one of the canonical slots.
    #[error("invalid time slot")]
    InvalidSlot,

    /// The slot is administratively blocked.
    #[error("date and time is blocked")]
    SlotBlocked,

    /// A hair style or hair color lookup failed.
    #[error("hair style or hair color not found")]
    CatalogLookupFailed,

    /// Unsupported payment type string.
    #[error("invalid payment type: {0}")]
    InvalidPaymentType(String),

    /// No active barber is free at the requested slot.
    #[error("no barber available at the requested date and time")]
    NoAvailableBarber,

    /// Malformed or non-positive order id.
    #[error("invalid order id: {0}")]
    InvalidId(String),

    /// Sort direction other than `asc` or `desc`.
    #[error("invalid sort direction: {0}")]
    InvalidSortBy(String),

    /// Malformed booking token.
    #[error("invalid booking token: {0}")]
    InvalidToken(String),

    /// The request carries no usable user reference.
    #[error("missing or invalid user reference")]
    Unauthenticated,

    /// Order with the given id does not exist.
    #[error("order not found: {0}")]
    OrderNotFound(i32),

    /// No staged booking or confirmed order exists under the token.
    #[error("staged booking not found: {0}")]
    StagedBookingNotFound(String),

    /// A collaborator could not be reached in time.
    #[error("collaborator unavailable: {0}")]
    GatewayUnavailable(String),

    /// A collaborator answered with an error.
    #[error("collaborator error: {0}")]
    Gateway(String),

    /// A service invariant was violated.
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BookingError {
    /// Returns the failure category for this variant.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDateTime
            | Self::OutOfRange
            | Self::InvalidSlot
            | Self::SlotBlocked
            | Self::CatalogLookupFailed
            | Self::InvalidPaymentType(_)
            | Self::NoAvailableBarber
            | Self::InvalidId(_)
            | Self::InvalidSortBy(_)
            | Self::InvalidToken(_)
            | Self::Unauthenticated => ErrorCategory::Validation,
            Self::OrderNotFound(_) | Self::StagedBookingNotFound(_) => ErrorCategory::NotFound,
            Self::GatewayUnavailable(_) | Self::Gateway(_) => ErrorCategory::Gateway,
            Self::IntegrityViolation(_) => ErrorCategory::Integrity,
            Self::Persistence(_) | Self::Internal(_) => ErrorCategory::Server,
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidDateTime => 1001,
            Self::OutOfRange => 1002,
            Self::InvalidSlot => 1003,
            Self::SlotBlocked => 1004,
            Self::CatalogLookupFailed => 1005,
            Self::InvalidPaymentType(_) => 1006,
            Self::NoAvailableBarber => 1007,
            Self::InvalidId(_) => 1008,
            Self::InvalidSortBy(_) => 1009,
            Self::Unauthenticated => 1010,
            Self::InvalidToken(_) => 1011,
            Self::OrderNotFound(_) => 2001,
            Self::StagedBookingNotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Gateway(_) => 3002,
            Self::GatewayUnavailable(_) => 3003,
            Self::IntegrityViolation(_) => 3004,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NoAvailableBarber => StatusCode::CONFLICT,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::OrderNotFound(_) | Self::StagedBookingNotFound(_) => StatusCode::NOT_FOUND,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
            Self::GatewayUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::IntegrityViolation(_) | Self::Persistence(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns the user-visible field error for this variant.
    ///
    /// Server-side failures collapse into one opaque entry so that no
    /// internal detail reaches the caller.
    #[must_use]
    pub fn field_error(&self) -> FieldError {
        match self {
            Self::InvalidDateTime => {
                FieldError::new("date; time", "Invalid date and time", "BookingRequest")
            }
            Self::OutOfRange => FieldError::new(
                "date; time",
                "Date and time must be within [0; 6] days from now",
                "BookingRequest",
            ),
            Self::InvalidSlot => FieldError::new("time", "Invalid time slot", "BookingRequest"),
            Self::SlotBlocked => {
                FieldError::new("date; time", "Date and time is blocked", "BookingRequest")
            }
            Self::CatalogLookupFailed => FieldError::new(
                "hair style, hair color",
                "Hair style or hair color not found",
                "BookingRequest",
            ),
            Self::InvalidPaymentType(_) => FieldError::new(
                "payment type",
                "Payment type must be VNPAY or MOMO",
                "PaymentRequest",
            ),
            Self::NoAvailableBarber => FieldError::new(
                "date; time",
                "No barber available at the requested date and time",
                "PaymentRequest",
            ),
            Self::InvalidId(message) => FieldError::new("Order id", message.as_str(), "Path Variable"),
            Self::InvalidSortBy(_) => {
                FieldError::new("sort by", "Sort by must be asc or desc", "ListOrdersRequest")
            }
            Self::Unauthenticated => {
                FieldError::new("user", "Missing or invalid user reference", "Header")
            }
            Self::InvalidToken(_) => {
                FieldError::new("booking token", "Booking token must be a UUID", "Path Variable")
            }
            Self::OrderNotFound(_) => FieldError::new("Order id", "Order not found", "Order"),
            Self::StagedBookingNotFound(_) => FieldError::new(
                "booking token",
                "Staged booking not found or expired",
                "StagedBooking",
            ),
            Self::GatewayUnavailable(_)
            | Self::Gateway(_)
            | Self::IntegrityViolation(_)
            | Self::Persistence(_)
            | Self::Internal(_) => FieldError::new("", "Internal server error", "Server"),
        }
    }
}

impl From<CollaboratorError> for BookingError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::Timeout(_) | CollaboratorError::Transport(_) => {
                Self::GatewayUnavailable(err.to_string())
            }
            CollaboratorError::NotFound(_) | CollaboratorError::Rejected(_) => {
                Self::Gateway(err.to_string())
            }
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if matches!(
            self.category(),
            ErrorCategory::Gateway | ErrorCategory::Integrity | ErrorCategory::Server
        ) {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let body = ErrorResponse {
            code: self.error_code(),
            errors: vec![self.field_error()],
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
