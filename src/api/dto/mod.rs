//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names are camelCase on the wire. Successful responses wrap their
//! payload in a `data` field.

pub mod booking_dto;
pub mod common_dto;
pub mod order_dto;

pub use booking_dto::*;
pub use common_dto::*;
pub use order_dto::*;
