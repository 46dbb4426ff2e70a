//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::UserRef;
use crate::error::BookingError;

/// Header carrying the authenticated user's id, set by the upstream gateway.
pub const USER_HEADER: &str = "x-user-id";

/// The user on whose behalf a request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestingUser(pub UserRef);

impl<S> FromRequestParts<S> for RequestingUser
where
    S: Send + Sync,
{
    type Rejection = BookingError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .map(|id| Self(UserRef { id }))
            .ok_or(BookingError::Unauthenticated)
    }
}
