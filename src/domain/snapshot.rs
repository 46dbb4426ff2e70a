//! Point-in-time copies of collaborator entities.
//!
//! Snapshots are embedded in quotes, staged bookings and persisted orders.
//! Field declaration order is the serialization order, which downstream
//! readers of staged and persisted JSON depend on.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Barber as listed by the barber directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BarberSnapshot {
    /// Barber id.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Avatar URL. Refreshed live when an order is read back.
    #[serde(default, alias = "img")]
    pub avatar: String,
    /// Whether the barber currently takes bookings.
    pub active: bool,
}

/// How a discount reduces the hair style price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiscountUnit {
    /// `value` is a percentage of the price.
    #[serde(alias = "%")]
    Percentage,
    /// `value` is an absolute amount.
    Fixed,
}

/// Discount attached to a hair style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Discount {
    /// Discount unit.
    pub unit: DiscountUnit,
    /// Percentage points or absolute amount, depending on `unit`.
    pub value: i64,
}

/// Hair style as served by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HairStyleSnapshot {
    /// Hair style id.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// List price.
    pub price: i64,
    /// Whether the style is offered.
    pub active: bool,
    /// Optional discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
}

/// Hair color as served by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HairColorSnapshot {
    /// Hair color id.
    pub id: i32,
    /// Color name.
    pub color: String,
    /// Price added on top of the (discounted) hair style price.
    pub price: i64,
    /// Whether the color is offered.
    pub active: bool,
    /// Hex code or swatch reference.
    pub color_code: String,
}
