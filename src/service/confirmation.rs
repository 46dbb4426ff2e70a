//! Conversion of staged bookings into persisted orders.
//!
//! Confirmation runs once the payment for a booking token has succeeded. The
//! staged entry is read, persisted through the idempotent
//! [`OrderRepository::insert_order`] and only then removed from staging, so a
//! retry after a failed insert still finds it. Confirming a token whose entry
//! is already gone returns the order created from it.

use std::sync::Arc;

use crate::clients::Deadline;
use crate::domain::{BookingToken, NewOrder, StagedBooking, StagingStore};
use crate::error::BookingError;
use crate::persistence::OrderRepository;

/// Persists staged bookings as orders.
#[derive(Debug, Clone)]
pub struct ConfirmationService {
    staging: Arc<dyn StagingStore>,
    orders: Arc<dyn OrderRepository>,
    deadline: Deadline,
}

impl ConfirmationService {
    /// Creates a confirmation service over the staging store and repository.
    #[must_use]
    pub fn new(
        staging: Arc<dyn StagingStore>,
        orders: Arc<dyn OrderRepository>,
        deadline: Deadline,
    ) -> Self {
        Self {
            staging,
            orders,
            deadline,
        }
    }

    /// Confirms the booking staged under `token` and returns its order id.
    ///
    /// Calling this again with the same token returns the same id without
    /// creating a second order.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StagedBookingNotFound`] when nothing is staged
    /// under `token` and no order was created from it,
    /// [`BookingError::IntegrityViolation`] for an unreadable staged entry,
    /// or a persistence error.
    pub async fn confirm(&self, token: BookingToken) -> Result<i32, BookingError> {
        let Some(raw) = self.staging.get(token).await else {
            return self.already_confirmed(token).await;
        };

        let staged: StagedBooking = serde_json::from_str(&raw).map_err(|e| {
            BookingError::IntegrityViolation(format!("unreadable staged booking {token}: {e}"))
        })?;
        let order = NewOrder::from_staged(token, &staged)?;

        let order_id = self
            .deadline
            .bound("order repository", self.orders.insert_order(&order))
            .await?;
        self.staging.take(token).await;

        tracing::info!(
            %token,
            order_id,
            user = staged.user.id,
            barber = staged.barber.id,
            schedule = %staged.schedule,
            "booking confirmed"
        );
        Ok(order_id)
    }

    async fn already_confirmed(&self, token: BookingToken) -> Result<i32, BookingError> {
        let existing = self
            .deadline
            .bound("order repository", self.orders.find_order_id_by_token(token))
            .await?;
        match existing {
            Some(order_id) => {
                tracing::debug!(%token, order_id, "booking already confirmed");
                Ok(order_id)
            }
            None => Err(BookingError::StagedBookingNotFound(token.to_string())),
        }
    }
}
