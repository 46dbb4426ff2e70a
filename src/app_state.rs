//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::{BookingService, ConfirmationService, OrderQueryService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Quote and payment orchestration.
    pub booking_service: Arc<BookingService>,
    /// Confirmed order reads.
    pub order_query: Arc<OrderQueryService>,
    /// Staged booking to order conversion.
    pub confirmation: Arc<ConfirmationService>,
}
