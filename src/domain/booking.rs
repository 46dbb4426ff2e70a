//! Booking request, quote and staged booking value types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::schedule::{Slot, format_order_time};
use super::snapshot::{BarberSnapshot, HairColorSnapshot, HairStyleSnapshot};
use crate::error::BookingError;

/// Reference to the user a booking belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRef {
    /// User id as issued by the user service.
    pub id: i32,
}

/// Inputs of a quote or payment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// Requesting user.
    pub user: UserRef,
    /// Requested date, `yyyy-MM-dd`.
    pub date: String,
    /// Requested time of day, `HH:mm`.
    pub time: String,
    /// Hair style to price.
    pub hair_style_id: i32,
    /// Optional hair color. `None` and `Some(0)` both mean "no color".
    pub hair_color_id: Option<i32>,
}

impl BookingRequest {
    /// The hair color id to look up, if any.
    #[must_use]
    pub fn requested_hair_color(&self) -> Option<i32> {
        self.hair_color_id.filter(|id| *id != 0)
    }
}

/// Payment providers accepted for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    /// VNPay.
    Vnpay,
    /// MoMo wallet.
    Momo,
}

impl PaymentType {
    /// Wire name of the provider.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vnpay => "VNPAY",
            Self::Momo => "MOMO",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VNPAY" => Ok(Self::Vnpay),
            "MOMO" => Ok(Self::Momo),
            other => Err(BookingError::InvalidPaymentType(other.to_string())),
        }
    }
}

/// Status carried by a staged booking.
///
/// ```text
/// PENDING ──▶ SUCCESS
///    │
///    └──────▶ FAILED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    /// Payment initiated, not confirmed.
    Pending,
    /// Payment confirmed.
    Success,
    /// Payment failed or was abandoned.
    Failed,
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            _ => Err(format!("unknown booking status: {s}")),
        }
    }
}

/// Fully recomputed price and availability answer for a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Barber who would take the booking.
    pub barber: BarberSnapshot,
    /// Priced hair style.
    pub hair_style: HairStyleSnapshot,
    /// Requesting user, echoed.
    pub user: UserRef,
    /// Priced hair color, if one was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<HairColorSnapshot>,
    /// Amount to pay.
    pub amount: i64,
}

/// Unconfirmed booking held in the staging store while payment runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StagedBooking {
    /// Booking owner.
    pub user: UserRef,
    /// `date + " " + time` as requested.
    pub schedule: String,
    /// Whether the service has been delivered. Always `false` when staged.
    pub cutted: bool,
    /// Barber snapshot.
    pub barber: BarberSnapshot,
    /// Hair style snapshot.
    pub hair_style: HairStyleSnapshot,
    /// Hair color snapshot, `null` when none was requested.
    pub hair_color: Option<HairColorSnapshot>,
    /// Staging instant, `yyyy-MM-dd HH:mm:ss` in shop time.
    pub order_time: String,
    /// Amount handed to the payment gateway.
    pub amount: i64,
    /// Booking status.
    pub status: BookingStatus,
    /// Payment provider.
    pub payment_type: PaymentType,
}

impl StagedBooking {
    /// Builds the staged snapshot of a freshly computed quote.
    #[must_use]
    pub fn from_quote(
        quote: Quote,
        slot: &Slot,
        payment_type: PaymentType,
        status: BookingStatus,
        now: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            user: quote.user,
            schedule: slot.schedule(),
            cutted: false,
            barber: quote.barber,
            hair_style: quote.hair_style,
            hair_color: quote.hair_color,
            order_time: format_order_time(now),
            amount: quote.amount,
            status,
            payment_type,
        }
    }
}
