//! Opaque staging token.
//!
//! [`BookingToken`] is a newtype wrapper around [`uuid::Uuid`] (v4) so that
//! staging keys cannot be confused with other UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// Single-use key of a staged booking.
///
/// Wraps a random UUID v4 (122 bits of entropy). Generated once per payment
/// request and used both as the staging store key and as the payment gateway
/// correlation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingToken(uuid::Uuid);

impl BookingToken {
    /// Creates a new random `BookingToken` (UUID v4).
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `BookingToken` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for BookingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingToken {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| BookingError::InvalidToken(s.to_string()))
    }
}

impl From<uuid::Uuid> for BookingToken {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}
