//! OpenAPI description of the REST surface.
//!
//! Served as JSON at `/api-docs/openapi.json` and browsable at `/swagger-ui`
//! when the `swagger-ui` feature is enabled.

use utoipa::OpenApi;

use crate::api::dto::{
    ConfirmedOrderDto, PaymentRequest, PaymentUrlDto, QuoteRequest, QuoteResponse,
};
use crate::api::handlers::system::HealthResponse;
use crate::domain::order::HairColorBrief;
use crate::domain::{
    BarberSnapshot, BookingStatus, Discount, DiscountUnit, EnrichedOrder, HairColorSnapshot,
    HairStyleSnapshot, OrderSummary, PageMeta, PaymentType, Quote, UserRef,
};
use crate::error::{ErrorResponse, FieldError};

/// API documentation root.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Barber Booking API",
        description = "Quotes, payment hand-off and order history for barbershop appointments."
    ),
    paths(
        crate::api::handlers::booking::quote,
        crate::api::handlers::booking::payment,
        crate::api::handlers::booking::confirm,
        crate::api::handlers::order::get_order,
        crate::api::handlers::order::list_orders,
        crate::api::handlers::system::health_handler,
        crate::api::handlers::system::time_slots_handler,
    ),
    components(
        schemas(
            QuoteRequest,
            PaymentRequest,
            QuoteResponse,
            PaymentUrlDto,
            ConfirmedOrderDto,
            Quote,
            UserRef,
            BarberSnapshot,
            HairStyleSnapshot,
            HairColorSnapshot,
            Discount,
            DiscountUnit,
            PaymentType,
            BookingStatus,
            EnrichedOrder,
            OrderSummary,
            HairColorBrief,
            PageMeta,
            HealthResponse,
            ErrorResponse,
            FieldError,
        )
    ),
    tags(
        (name = "Orders", description = "Booking quotes, payment and order history"),
        (name = "System", description = "Health and shop configuration"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/orders/info",
            "/api/v1/orders/payment",
            "/api/v1/orders/confirm/{token}",
            "/api/v1/orders/{id}",
            "/api/v1/orders",
            "/health",
            "/config/time-slots",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }

    #[test]
    fn serializes_to_json() {
        let doc = ApiDoc::openapi();
        assert!(doc.to_json().is_ok_and(|json| json.contains("Barber Booking API")));
    }
}
