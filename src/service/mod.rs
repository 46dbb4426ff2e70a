//! Service layer: booking orchestration and order queries.
//!
//! A quote flows [`ValidationPipeline`] → [`AvailabilityResolver`] →
//! [`PricingEngine`]. [`BookingService`] runs that pipeline for quotes and,
//! for payments, stages the result and hands it to the payment gateway.
//! [`ConfirmationService`] turns a staged booking into an order once payment
//! succeeds. [`OrderQueryService`] reads confirmed orders back and enriches them.
//!
//! Every collaborator call is awaited to completion before the next one is
//! issued, each under the configured [`crate::clients::Deadline`].

pub mod availability;
pub mod booking_service;
pub mod confirmation;
pub mod order_query;
pub mod pricing;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use availability::AvailabilityResolver;
pub use booking_service::{BookingService, PaymentHandoff};
pub use confirmation::ConfirmationService;
pub use order_query::{ListOrdersRequest, OrderQueryService};
pub use pricing::{PricedItems, PricingEngine};
pub use validation::ValidationPipeline;
