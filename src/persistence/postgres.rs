//! PostgreSQL implementation of the order repository.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;

use super::OrderRepository;
use super::models::OrderRow;
use crate::config::BookingConfig;
use crate::domain::{BookingToken, NewOrder, Order, OrderFilter, PageRequest};
use crate::error::BookingError;

const ORDER_COLUMNS: &str = "id, user_id, schedule, barber, hair_style, hair_color, order_time, cutted";

/// PostgreSQL-backed order repository using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized by `config` and applies pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::Persistence`] if the database is
    /// unreachable or a migration fails.
    pub async fn connect(config: &BookingConfig) -> Result<Self, BookingError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_barber_ids(
        &self,
        candidates: &[i32],
        schedule: DateTime<Utc>,
    ) -> Result<Vec<i32>, BookingError> {
        sqlx::query_scalar::<_, i32>(
            "SELECT c.id FROM UNNEST($1::int4[]) WITH ORDINALITY AS c(id, ord) \
             WHERE NOT EXISTS (SELECT 1 FROM orders o WHERE o.barber_id = c.id AND o.schedule = $2) \
             ORDER BY c.ord",
        )
        .bind(candidates)
        .bind(schedule)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BookingError::Persistence(e.to_string()))
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<i32, BookingError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()))?;

        let inserted = sqlx::query_scalar::<_, i32>(
            "INSERT INTO orders (booking_token, user_id, schedule, barber, hair_style, hair_color, order_time, cutted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (booking_token) DO NOTHING RETURNING id",
        )
        .bind(*order.booking_token.as_uuid())
        .bind(order.user_id)
        .bind(order.schedule)
        .bind(Json(&order.barber))
        .bind(Json(&order.hair_style))
        .bind(order.hair_color.as_ref().map(Json))
        .bind(order.order_time)
        .bind(order.cutted)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| BookingError::Persistence(e.to_string()))?;

        let id = if let Some(id) = inserted {
            id
        } else {
            tracing::info!(token = %order.booking_token, "booking already confirmed");
            sqlx::query_scalar::<_, i32>("SELECT id FROM orders WHERE booking_token = $1")
                .bind(*order.booking_token.as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| BookingError::Persistence(e.to_string()))?
        };

        tx.commit()
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()))?;

        Ok(id)
    }

    async fn find_order_id_by_token(
        &self,
        token: BookingToken,
    ) -> Result<Option<i32>, BookingError> {
        sqlx::query_scalar::<_, i32>("SELECT id FROM orders WHERE booking_token = $1")
            .bind(*token.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()))
    }

    async fn find_order(&self, id: i32) -> Result<Option<Order>, BookingError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BookingError::Persistence(e.to_string()))?;

        row.map(Order::try_from).transpose()
    }

    async fn list_orders(
        &self,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> Result<Vec<Order>, BookingError> {
        let direction = page.sort.as_sql();
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = $1 AND ($2::int4 IS NULL OR id = $2) \
             ORDER BY order_time {direction}, id {direction} \
             LIMIT $3 OFFSET $4"
        ))
        .bind(filter.user_id)
        .bind(filter.order_id)
        .bind(i64::from(page.items))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BookingError::Persistence(e.to_string()))?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn count_orders(&self, filter: &OrderFilter) -> Result<i64, BookingError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND ($2::int4 IS NULL OR id = $2)",
        )
        .bind(filter.user_id)
        .bind(filter.order_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| BookingError::Persistence(e.to_string()))
    }
}
