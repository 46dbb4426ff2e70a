//! Quote computation and payment hand-off.
//!
//! A quote is recomputed from scratch on every call. Staging a payment runs
//! the quote again, writes the result under a fresh booking token and only
//! then asks the payment gateway for a redirect URL, so a failed payment
//! initiation leaves an orphan entry that expires with its TTL.

use std::sync::Arc;

use crate::clients::{Deadline, PaymentGateway};
use crate::domain::schedule::now_in_shop;
use crate::domain::{
    BookingRequest, BookingStatus, BookingToken, PaymentType, Quote, STAGING_TTL, Slot,
    StagedBooking, StagingStore,
};
use crate::error::BookingError;
use crate::service::{AvailabilityResolver, PricingEngine, ValidationPipeline};

/// Result of a successful payment hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentHandoff {
    /// Token correlating the staged booking with the payment transaction.
    pub token: BookingToken,
    /// Provider URL the client is redirected to.
    pub payment_url: String,
}

/// Orchestrates validation, availability and pricing for bookings.
#[derive(Debug, Clone)]
pub struct BookingService {
    validation: ValidationPipeline,
    availability: AvailabilityResolver,
    pricing: PricingEngine,
    staging: Arc<dyn StagingStore>,
    payments: Arc<dyn PaymentGateway>,
    deadline: Deadline,
    staged_status: BookingStatus,
}

impl BookingService {
    /// Creates a booking service from its components.
    #[must_use]
    pub fn new(
        validation: ValidationPipeline,
        availability: AvailabilityResolver,
        pricing: PricingEngine,
        staging: Arc<dyn StagingStore>,
        payments: Arc<dyn PaymentGateway>,
        deadline: Deadline,
        staged_status: BookingStatus,
    ) -> Self {
        Self {
            validation,
            availability,
            pricing,
            staging,
            payments,
            deadline,
            staged_status,
        }
    }

    /// Computes the quote for `request`. `None` means no barber is free at
    /// the requested slot.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, a catalog or gateway error, or
    /// a persistence error from the availability lookup.
    pub async fn quote(&self, request: &BookingRequest) -> Result<Option<Quote>, BookingError> {
        Ok(self
            .quote_slot(request)
            .await?
            .map(|(_, quote)| quote))
    }

    async fn quote_slot(
        &self,
        request: &BookingRequest,
    ) -> Result<Option<(Slot, Quote)>, BookingError> {
        let slot = self.validation.validate(&request.date, &request.time).await?;

        let Some(barber) = self.availability.resolve(&slot).await? else {
            tracing::debug!(
                date = slot.date(),
                time = slot.time(),
                "no barber available"
            );
            return Ok(None);
        };

        let priced = self
            .pricing
            .price(request.hair_style_id, request.requested_hair_color())
            .await?;

        let quote = Quote {
            barber,
            hair_style: priced.hair_style,
            user: request.user,
            hair_color: priced.hair_color,
            amount: priced.amount,
        };
        Ok(Some((slot, quote)))
    }

    /// Stages the booking and initiates payment with `payment_type`.
    ///
    /// The payment type is checked before any collaborator is called.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidPaymentType`] for an unknown provider,
    /// [`BookingError::NoAvailableBarber`] if nobody is free, any error
    /// [`BookingService::quote`] can return, or a gateway error if payment
    /// initiation fails.
    pub async fn stage_payment(
        &self,
        request: &BookingRequest,
        payment_type: &str,
    ) -> Result<PaymentHandoff, BookingError> {
        let payment_type: PaymentType = payment_type.parse()?;

        let (slot, quote) = self
            .quote_slot(request)
            .await?
            .ok_or(BookingError::NoAvailableBarber)?;

        let staged = StagedBooking::from_quote(
            quote,
            &slot,
            payment_type,
            self.staged_status,
            now_in_shop(),
        );
        let amount = staged.amount;
        let payload =
            serde_json::to_string(&staged).map_err(|e| BookingError::Internal(e.to_string()))?;

        let token = BookingToken::generate();
        self.staging.set(token, payload, STAGING_TTL).await?;
        tracing::info!(
            %token,
            user = staged.user.id,
            barber = staged.barber.id,
            schedule = %staged.schedule,
            amount,
            %payment_type,
            "booking staged"
        );

        let payment_url = self
            .deadline
            .bound(
                "payment service",
                self.payments.initiate(token, payment_type, amount),
            )
            .await?;

        Ok(PaymentHandoff { token, payment_url })
    }
}
