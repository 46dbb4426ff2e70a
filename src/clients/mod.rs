//! Collaborator ports and their deadline guard.
//!
//! Every downstream service the booking core talks to is an `async_trait`
//! port, injected into the service components at construction. Production
//! adapters live in [`http`]; tests substitute in-process fakes.

pub mod http;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    BarberSnapshot, BookingToken, HairColorSnapshot, HairStyleSnapshot, PaymentRecord,
    PaymentType,
};

pub use http::{
    HttpBarberDirectory, HttpBlockTimeService, HttpHairColorCatalog, HttpHairStyleCatalog,
    HttpPaymentGateway, build_client,
};

/// Failure of a single collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// The requested entity does not exist.
    #[error("{0} not found")]
    NotFound(String),
    /// The collaborator answered with an error.
    #[error("rejected: {0}")]
    Rejected(String),
    /// The collaborator could not be reached or answered garbage.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The call did not finish within its deadline.
    #[error("{0} timed out")]
    Timeout(String),
}

/// Barber directory service.
#[async_trait]
pub trait BarberDirectory: Send + Sync + fmt::Debug {
    /// Lists active and inactive barbers in directory order.
    async fn list_barbers(&self) -> Result<Vec<BarberSnapshot>, CollaboratorError>;

    /// Fetches one barber.
    async fn get_barber(&self, id: i32) -> Result<BarberSnapshot, CollaboratorError>;
}

/// Scheduling service holding administratively blocked slots.
#[async_trait]
pub trait BlockTimeService: Send + Sync + fmt::Debug {
    /// Returns `true` if the slot is blocked.
    async fn is_blocked(&self, date: &str, time: &str) -> Result<bool, CollaboratorError>;
}

/// Hair style catalog.
#[async_trait]
pub trait HairStyleCatalog: Send + Sync + fmt::Debug {
    /// Fetches one hair style.
    async fn get_hair_style(&self, id: i32) -> Result<HairStyleSnapshot, CollaboratorError>;
}

/// Hair color catalog.
#[async_trait]
pub trait HairColorCatalog: Send + Sync + fmt::Debug {
    /// Fetches one hair color.
    async fn get_hair_color(&self, id: i32) -> Result<HairColorSnapshot, CollaboratorError>;
}

/// Payment service.
#[async_trait]
pub trait PaymentGateway: Send + Sync + fmt::Debug {
    /// Starts a transaction correlated by `token` and returns the provider
    /// redirect URL.
    async fn initiate(
        &self,
        token: BookingToken,
        payment_type: PaymentType,
        amount: i64,
    ) -> Result<String, CollaboratorError>;

    /// Fetches the payment rows of the given orders in one round trip.
    async fn payments_by_order_ids(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<PaymentRecord>, CollaboratorError>;
}

/// Per-call deadline applied to every collaborator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    limit: Duration,
}

impl Deadline {
    /// Creates a deadline of `limit` per call.
    #[must_use]
    pub const fn new(limit: Duration) -> Self {
        Self { limit }
    }

    /// The per-call limit.
    #[must_use]
    pub const fn limit(&self) -> Duration {
        self.limit
    }

    /// Awaits `call`, failing with [`CollaboratorError::Timeout`] if it runs
    /// past the limit.
    ///
    /// # Errors
    ///
    /// Returns the call's own error, or a timeout naming `collaborator`.
    pub async fn bound<T, E, F>(&self, collaborator: &'static str, call: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<CollaboratorError>,
    {
        if let Ok(result) = tokio::time::timeout(self.limit, call).await {
            result
        } else {
            tracing::warn!(
                collaborator,
                limit_ms = self.limit.as_millis(),
                "collaborator call timed out"
            );
            Err(E::from(CollaboratorError::Timeout(collaborator.to_string())))
        }
    }
}
