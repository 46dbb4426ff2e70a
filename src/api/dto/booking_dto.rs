//! Quote and payment request/response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookingRequest, Quote, UserRef};

/// Request body for `POST /orders/info`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Requested date, `yyyy-MM-dd`.
    pub date: String,
    /// Requested time, `HH:mm`.
    pub time: String,
    /// Hair style to price.
    pub hair_style_id: i32,
    /// Optional hair color; `0` or absent means none.
    #[serde(default)]
    pub hair_color_id: Option<i32>,
}

impl QuoteRequest {
    /// Builds the booking request on behalf of `user`.
    #[must_use]
    pub fn into_booking(self, user: UserRef) -> BookingRequest {
        BookingRequest {
            user,
            date: self.date,
            time: self.time,
            hair_style_id: self.hair_style_id,
            hair_color_id: self.hair_color_id,
        }
    }
}

/// Request body for `POST /orders/payment`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Booking being paid for.
    #[serde(flatten)]
    pub booking: QuoteRequest,
    /// Payment provider, `VNPAY` or `MOMO`.
    pub payment_type: String,
}

/// Response body of `POST /orders/info`. `data` is `null` when no barber is
/// free.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuoteResponse {
    /// The quote.
    pub data: Option<Quote>,
}

/// Redirect returned by `POST /orders/payment`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUrlDto {
    /// Payment provider URL.
    pub payment_url: String,
}

/// Order created by `POST /orders/confirm/{token}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedOrderDto {
    /// Id of the persisted order.
    pub order_id: i32,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn payment_request_flattens_booking_fields() {
        let body = r#"{"date":"2026-10-20","time":"10:00","hairStyleId":1,"paymentType":"MOMO"}"#;
        let Ok(request) = serde_json::from_str::<PaymentRequest>(body) else {
            panic!("body should parse");
        };
        assert_eq!(request.payment_type, "MOMO");
        assert_eq!(request.booking.hair_style_id, 1);
        assert_eq!(request.booking.hair_color_id, None);
    }

    #[test]
    fn confirmed_order_uses_camel_case() {
        let dto = ConfirmedOrderDto { order_id: 4 };
        assert_eq!(
            serde_json::to_value(&dto).ok(),
            Some(serde_json::json!({"orderId": 4}))
        );
    }
}
