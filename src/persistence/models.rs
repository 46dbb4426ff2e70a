//! Database models for persisted orders.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::domain::Order;
use crate::error::BookingError;

/// A stored row from the `orders` table.
///
/// Snapshots are stored as JSONB exactly as they were serialized at booking
/// time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    /// Auto-increment order id.
    pub id: i32,
    /// Owner.
    pub user_id: i32,
    /// Booked slot start.
    pub schedule: DateTime<Utc>,
    /// Barber snapshot.
    pub barber: serde_json::Value,
    /// Hair style snapshot.
    pub hair_style: serde_json::Value,
    /// Hair color snapshot, `NULL` when none was booked.
    pub hair_color: Option<serde_json::Value>,
    /// Staging instant.
    pub order_time: DateTime<Utc>,
    /// Delivery flag.
    pub cutted: bool,
}

impl TryFrom<OrderRow> for Order {
    type Error = BookingError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let id = row.id;
        Ok(Self {
            id,
            user_id: row.user_id,
            schedule: row.schedule,
            barber: decode_snapshot(id, "barber", row.barber)?,
            hair_style: decode_snapshot(id, "hair_style", row.hair_style)?,
            hair_color: row
                .hair_color
                .filter(|value| !value.is_null())
                .map(|value| decode_snapshot(id, "hair_color", value))
                .transpose()?,
            order_time: row.order_time,
            cutted: row.cutted,
        })
    }
}

fn decode_snapshot<T: DeserializeOwned>(
    order_id: i32,
    column: &str,
    value: serde_json::Value,
) -> Result<T, BookingError> {
    serde_json::from_value(value).map_err(|e| {
        BookingError::IntegrityViolation(format!("order {order_id}: unreadable {column}: {e}"))
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(hair_color: Option<serde_json::Value>) -> OrderRow {
        let Some(ts) = Utc.with_ymd_and_hms(2026, 10, 20, 3, 0, 0).single() else {
            panic!("valid timestamp");
        };
        OrderRow {
            id: 42,
            user_id: 7,
            schedule: ts,
            barber: serde_json::json!({"id": 1, "name": "Tuan", "avatar": "old.png", "active": true}),
            hair_style: serde_json::json!({
                "id": 3, "name": "Fade", "price": 200, "active": true,
                "discount": {"unit": "%", "value": 10}
            }),
            hair_color,
            order_time: ts,
            cutted: false,
        }
    }

    #[test]
    fn decodes_snapshots() {
        let Ok(order) = Order::try_from(row(None)) else {
            panic!("decode failed");
        };
        assert_eq!(order.id, 42);
        assert_eq!(order.barber.avatar, "old.png");
        assert!(order.hair_style.discount.is_some());
        assert!(order.hair_color.is_none());
    }

    #[test]
    fn json_null_hair_color_is_none() {
        let Ok(order) = Order::try_from(row(Some(serde_json::Value::Null))) else {
            panic!("decode failed");
        };
        assert!(order.hair_color.is_none());
    }

    #[test]
    fn unreadable_snapshot_is_an_integrity_violation() {
        let broken = row(Some(serde_json::json!({"id": "not a number"})));
        assert!(matches!(
            Order::try_from(broken),
            Err(BookingError::IntegrityViolation(_))
        ));
    }
}
