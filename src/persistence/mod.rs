//! Persistence layer: confirmed orders in PostgreSQL.
//!
//! Provides the [`OrderRepository`] port used by availability resolution and
//! order queries. The concrete implementation uses `sqlx::PgPool` for async
//! PostgreSQL access.

pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BookingToken, NewOrder, Order, OrderFilter, PageRequest};
use crate::error::BookingError;

pub use postgres::PostgresOrderRepository;

/// Read and write access to persisted orders.
#[async_trait]
pub trait OrderRepository: Send + Sync + fmt::Debug {
    /// Returns the candidate barber ids with no order at `schedule`, in
    /// candidate order.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on database failure.
    async fn find_barber_ids(
        &self,
        candidates: &[i32],
        schedule: DateTime<Utc>,
    ) -> Result<Vec<i32>, BookingError>;

    /// Persists a confirmed booking and returns its order id. Inserting the
    /// same booking token twice returns the first order's id.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on database failure.
    async fn insert_order(&self, order: &NewOrder) -> Result<i32, BookingError>;

    /// Returns the id of the order created from `token`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on database failure.
    async fn find_order_id_by_token(&self, token: BookingToken)
    -> Result<Option<i32>, BookingError>;

    /// Loads one order.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on database failure.
    async fn find_order(&self, id: i32) -> Result<Option<Order>, BookingError>;

    /// Loads one page of orders matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on database failure.
    async fn list_orders(
        &self,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> Result<Vec<Order>, BookingError>;

    /// Counts all orders matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Persistence`] on database failure.
    async fn count_orders(&self, filter: &OrderFilter) -> Result<i64, BookingError>;
}
