//! Persisted orders and their read-side views.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::BookingToken;
use super::booking::{StagedBooking, UserRef};
use super::schedule::shop_timezone;
use super::snapshot::{BarberSnapshot, HairColorSnapshot, HairStyleSnapshot};
use crate::error::BookingError;

/// Literal prefix of human-facing order codes (`BBSOD42` is order 42).
pub const ORDER_CODE_PREFIX: &str = "BBSOD";

/// A confirmed booking as stored by the order writer.
///
/// Snapshot fields are immutable once persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Order id.
    pub id: i32,
    /// Owner.
    pub user_id: i32,
    /// Booked slot start.
    pub schedule: DateTime<Utc>,
    /// Barber snapshot taken at booking time.
    pub barber: BarberSnapshot,
    /// Hair style snapshot taken at booking time.
    pub hair_style: HairStyleSnapshot,
    /// Hair color snapshot taken at booking time.
    pub hair_color: Option<HairColorSnapshot>,
    /// When the booking was staged.
    pub order_time: DateTime<Utc>,
    /// Whether the service has been delivered.
    pub cutted: bool,
}

/// Insert shape of an [`Order`], keyed by the staging token it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Token of the staged booking being confirmed.
    pub booking_token: BookingToken,
    /// Owner.
    pub user_id: i32,
    /// Booked slot start.
    pub schedule: DateTime<Utc>,
    /// Barber snapshot.
    pub barber: BarberSnapshot,
    /// Hair style snapshot.
    pub hair_style: HairStyleSnapshot,
    /// Hair color snapshot.
    pub hair_color: Option<HairColorSnapshot>,
    /// Staging instant.
    pub order_time: DateTime<Utc>,
    /// Delivery flag.
    pub cutted: bool,
}

impl NewOrder {
    /// Converts a staged booking into its persisted shape.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::IntegrityViolation`] if the staged schedule or
    /// order time is not in the format staging writes.
    pub fn from_staged(token: BookingToken, staged: &StagedBooking) -> Result<Self, BookingError> {
        Ok(Self {
            booking_token: token,
            user_id: staged.user.id,
            schedule: parse_shop_time(&staged.schedule, "%Y-%m-%d %H:%M")?,
            barber: staged.barber.clone(),
            hair_style: staged.hair_style.clone(),
            hair_color: staged.hair_color.clone(),
            order_time: parse_shop_time(&staged.order_time, "%Y-%m-%d %H:%M:%S")?,
            cutted: staged.cutted,
        })
    }
}

fn parse_shop_time(value: &str, format: &str) -> Result<DateTime<Utc>, BookingError> {
    NaiveDateTime::parse_from_str(value, format)
        .ok()
        .and_then(|naive| naive.and_local_timezone(shop_timezone()).single())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| BookingError::IntegrityViolation(format!("malformed staged time: {value}")))
}

/// Payment row owned by the payment service, joined into order views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Order the payment belongs to.
    pub order_id: i32,
    /// Provider name.
    #[serde(rename = "type")]
    pub payment_type: String,
    /// Paid amount.
    pub amount: i64,
    /// Payment status as reported by the payment service.
    pub status: String,
}

/// Detail view of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedOrder {
    /// Order id.
    pub id: i32,
    /// Paid amount.
    pub amount: i64,
    /// Payment status.
    pub status: String,
    /// Payment provider.
    pub payment_type: String,
    /// Delivery flag.
    pub cutted: bool,
    /// Slot, `yyyy-MM-dd HH:mm`.
    pub schedule: String,
    /// Staging instant, `yyyy-MM-dd HH:mm:ss`.
    pub order_time: String,
    /// Requesting user.
    pub user: UserRef,
    /// Stored barber snapshot with a live avatar.
    pub barber: BarberSnapshot,
    /// Stored hair style snapshot.
    pub hair_style: HairStyleSnapshot,
    /// Stored hair color snapshot.
    pub hair_color: Option<HairColorSnapshot>,
}

/// Color fields shown in order lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HairColorBrief {
    /// Hex code or swatch reference.
    pub color_code: String,
    /// Color name.
    pub color: String,
}

/// Row of an order list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Order id.
    pub id: i32,
    /// Hair style name.
    pub hair_style: String,
    /// Hair color, if the order has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<HairColorBrief>,
    /// Staging instant, `yyyy-MM-dd HH:mm:ss`.
    pub order_time: String,
    /// Payment provider.
    pub payment_type: String,
    /// Paid amount.
    pub amount: i64,
}

/// Order list sort direction on order time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// Parses an optional `sortBy` value. Absent means [`SortDirection::Desc`].
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidSortBy`] for anything other than
    /// exactly `asc` or `desc`.
    pub fn parse(raw: Option<&str>) -> Result<Self, BookingError> {
        match raw {
            None => Ok(Self::default()),
            Some("asc") => Ok(Self::Asc),
            Some("desc") => Ok(Self::Desc),
            Some(other) => Err(BookingError::InvalidSortBy(other.to_string())),
        }
    }

    /// SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Extracts the order id from a `"BBSOD<id>"` search string.
///
/// Takes the text between the first and second occurrence of the prefix.
/// Returns `None` when there is no prefix or the remainder is not an
/// integer. Zero and negative ids are kept; they simply match no order.
#[must_use]
pub fn parse_order_code(search: &str) -> Option<i32> {
    search
        .split(ORDER_CODE_PREFIX)
        .nth(1)
        .and_then(|rest| rest.parse::<i32>().ok())
}

/// Filter shared by order list and count queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFilter {
    /// Owner of the listed orders.
    pub user_id: i32,
    /// Restrict to a single order id.
    pub order_id: Option<i32>,
}

impl OrderFilter {
    /// Builds a filter from the free-text "code or hair style" search.
    ///
    /// An unparsable code silently drops the id restriction.
    #[must_use]
    pub fn from_search(user_id: i32, code_or_hair_style: Option<&str>) -> Self {
        Self {
            user_id,
            order_id: code_or_hair_style.and_then(parse_order_code),
        }
    }
}

/// Page coordinates of a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Items per page.
    pub items: u32,
    /// Page number, 1-indexed.
    pub page: u32,
    /// Sort on order time.
    pub sort: SortDirection,
}

impl PageRequest {
    /// Largest page size ever queried.
    pub const MAX_ITEMS: u32 = 100;

    /// Page actually queried for a request: `items` clamped to
    /// `1..=MAX_ITEMS`, `page` to at least 1.
    #[must_use]
    pub fn clamped(items: u32, page: u32, sort: SortDirection) -> Self {
        Self {
            items: items.clamp(1, Self::MAX_ITEMS),
            page: page.max(1),
            sort,
        }
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.items)
    }
}

/// Pagination metadata of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Requested items per page.
    pub items: u32,
    /// Requested page.
    pub page: u32,
    /// Total matching records.
    pub total_records: i64,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Page<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}
