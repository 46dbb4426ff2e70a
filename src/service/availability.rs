//! Barber availability resolution.

use std::sync::Arc;

use chrono::Utc;

use crate::clients::{BarberDirectory, Deadline};
use crate::domain::{BarberSnapshot, Slot};
use crate::error::BookingError;
use crate::persistence::OrderRepository;

/// Picks the barber who takes a booking at a given slot.
#[derive(Debug, Clone)]
pub struct AvailabilityResolver {
    barbers: Arc<dyn BarberDirectory>,
    orders: Arc<dyn OrderRepository>,
    deadline: Deadline,
}

impl AvailabilityResolver {
    /// Creates a resolver over the barber directory and order store.
    #[must_use]
    pub fn new(
        barbers: Arc<dyn BarberDirectory>,
        orders: Arc<dyn OrderRepository>,
        deadline: Deadline,
    ) -> Self {
        Self {
            barbers,
            orders,
            deadline,
        }
    }

    /// Returns the first free, active barber at `slot`, or `None` when nobody
    /// is available. "No availability" is a normal outcome.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the directory is unreachable, or a
    /// persistence error if the free-barber query fails.
    pub async fn resolve(&self, slot: &Slot) -> Result<Option<BarberSnapshot>, BookingError> {
        let barbers = self
            .deadline
            .bound("barber directory", self.barbers.list_barbers())
            .await?;
        if barbers.is_empty() {
            return Ok(None);
        }

        let candidates: Vec<i32> = barbers.iter().map(|b| b.id).collect();
        let schedule = slot.starts_at().with_timezone(&Utc);
        let free_ids = self
            .deadline
            .bound(
                "order repository",
                self.orders.find_barber_ids(&candidates, schedule),
            )
            .await?;

        Ok(first_active(&free_ids, &barbers))
    }
}

/// Walks `free_ids` in order and returns the first one whose barber is active.
fn first_active(free_ids: &[i32], barbers: &[BarberSnapshot]) -> Option<BarberSnapshot> {
    free_ids
        .iter()
        .find_map(|id| barbers.iter().find(|b| b.id == *id && b.active))
        .cloned()
}
