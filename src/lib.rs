//! # barber-booking
//!
//! Booking orchestration core for a barbershop: appointment quotes, payment
//! hand-off and order history.
//!
//! A quote is assembled from several independently owned services (barber
//! directory, block-time scheduling, hair style and hair color catalogs).
//! A payment request recomputes the quote, stages it under a single-use
//! token for 30 minutes and returns the payment provider's redirect URL.
//! Confirmed orders are read back from PostgreSQL and joined with their
//! payments and the barber's current avatar.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── BookingService ──── ValidationPipeline → AvailabilityResolver → PricingEngine
//!     │        │
//!     │        ├── StagingStore (domain/)
//!     │        └── PaymentGateway (clients/)
//!     │
//!     ├── OrderQueryService (service/)
//!     │
//!     ├── Collaborator ports + HTTP adapters (clients/)
//!     └── PostgreSQL Persistence
//! ```

pub mod api;
pub mod app_state;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
