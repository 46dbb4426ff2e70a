//! TTL-bounded storage for staged bookings.
//!
//! [`StagingStore`] is the port the booking service writes staged bookings
//! to. [`InMemoryStagingStore`] keeps entries in a `HashMap` behind a
//! [`tokio::sync::RwLock`]; entries become unreachable once their TTL
//! elapses and are physically removed by [`StagingStore::purge_expired`].

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::BookingToken;
use crate::error::BookingError;

/// Lifetime of a staged booking: 30 minutes.
pub const STAGING_TTL: Duration = Duration::from_millis(1_800_000);

/// Key/value store holding serialized staged bookings under a TTL.
///
/// Keys are single-use tokens, so concurrent writers never target the same
/// entry.
#[async_trait]
pub trait StagingStore: Send + Sync + fmt::Debug {
    /// Stores `value` under `token` for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::IntegrityViolation`] if a live entry already
    /// exists under `token`.
    async fn set(&self, token: BookingToken, value: String, ttl: Duration)
    -> Result<(), BookingError>;

    /// Returns the live value under `token`, if any.
    async fn get(&self, token: BookingToken) -> Option<String>;

    /// Removes and returns the live value under `token`. A token can be
    /// taken at most once.
    async fn take(&self, token: BookingToken) -> Option<String>;

    /// Drops expired entries and returns how many were removed.
    async fn purge_expired(&self) -> usize;
}

#[derive(Debug)]
struct StagedEntry {
    value: String,
    expires_at: Instant,
}

impl StagedEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local [`StagingStore`].
#[derive(Debug, Default)]
pub struct InMemoryStagingStore {
    entries: RwLock<HashMap<BookingToken, StagedEntry>>,
}

impl InMemoryStagingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, live or not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl StagingStore for InMemoryStagingStore {
    async fn set(
        &self,
        token: BookingToken,
        value: String,
        ttl: Duration,
    ) -> Result<(), BookingError> {
        let now = Instant::now();
        let mut map = self.entries.write().await;
        if map.get(&token).is_some_and(|entry| entry.is_live(now)) {
            return Err(BookingError::IntegrityViolation(format!(
                "booking token {token} already staged"
            )));
        }
        map.insert(
            token,
            StagedEntry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, token: BookingToken) -> Option<String> {
        let now = Instant::now();
        let map = self.entries.read().await;
        map.get(&token)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    async fn take(&self, token: BookingToken) -> Option<String> {
        let now = Instant::now();
        let mut map = self.entries.write().await;
        map.remove(&token)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value)
    }

    async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut map = self.entries.write().await;
        let before = map.len();
        map.retain(|_, entry| entry.is_live(now));
        before - map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entry_is_readable_until_ttl_elapses() {
        let store = InMemoryStagingStore::new();
        let token = BookingToken::generate();
        let result = store.set(token, "staged".to_string(), STAGING_TTL).await;
        assert!(result.is_ok());

        tokio::time::advance(STAGING_TTL - Duration::from_secs(1)).await;
        assert_eq!(store.get(token).await.as_deref(), Some("staged"));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get(token).await, None);
    }

    #[tokio::test]
    async fn live_token_cannot_be_written_twice() {
        let store = InMemoryStagingStore::new();
        let token = BookingToken::generate();
        let _ = store.set(token, "first".to_string(), STAGING_TTL).await;
        let second = store.set(token, "second".to_string(), STAGING_TTL).await;
        assert!(matches!(second, Err(BookingError::IntegrityViolation(_))));
        assert_eq!(store.get(token).await.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn take_consumes_once() {
        let store = InMemoryStagingStore::new();
        let token = BookingToken::generate();
        let _ = store.set(token, "staged".to_string(), STAGING_TTL).await;
        assert_eq!(store.take(token).await.as_deref(), Some("staged"));
        assert_eq!(store.take(token).await, None);
        assert_eq!(store.get(token).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn take_after_expiry_returns_nothing() {
        let store = InMemoryStagingStore::new();
        let token = BookingToken::generate();
        let _ = store.set(token, "staged".to_string(), STAGING_TTL).await;
        tokio::time::advance(STAGING_TTL).await;
        assert_eq!(store.take(token).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn purge_removes_only_expired_entries() {
        let store = InMemoryStagingStore::new();
        let short = BookingToken::generate();
        let long = BookingToken::generate();
        let _ = store.set(short, "a".to_string(), Duration::from_secs(60)).await;
        let _ = store.set(long, "b".to_string(), STAGING_TTL).await;
        assert_eq!(store.len().await, 2);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(long).await.as_deref(), Some("b"));
        assert!(!store.is_empty().await);
    }
}
