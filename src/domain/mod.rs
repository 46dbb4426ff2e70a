//! Domain layer: booking value types, shop calendar and staging store.
//!
//! This module contains the server-side domain model: snapshots of
//! collaborator entities, quotes and staged bookings, persisted order views,
//! the canonical slot table, and the TTL store that holds staged bookings
//! while payment is initiated.

pub mod booking;
pub mod booking_token;
pub mod order;
pub mod schedule;
pub mod snapshot;
pub mod staging_store;

pub use booking::{BookingRequest, BookingStatus, PaymentType, Quote, StagedBooking, UserRef};
pub use booking_token::BookingToken;
pub use order::{
    EnrichedOrder, NewOrder, Order, OrderFilter, OrderSummary, Page, PageMeta, PageRequest,
    PaymentRecord, SortDirection,
};
pub use schedule::Slot;
pub use snapshot::{BarberSnapshot, Discount, DiscountUnit, HairColorSnapshot, HairStyleSnapshot};
pub use staging_store::{InMemoryStagingStore, STAGING_TTL, StagingStore};
