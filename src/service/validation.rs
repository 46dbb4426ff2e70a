//! Date/time validation for booking requests.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::clients::{BlockTimeService, Deadline};
use crate::domain::Slot;
use crate::domain::schedule::{is_canonical_slot, now_in_shop};
use crate::error::BookingError;

/// Checks a requested date and time against the booking rules.
///
/// Rules run in order and the first violation is returned:
/// 1. the pair parses as a shop-local timestamp,
/// 2. the timestamp lies in `[now, now + 6 days]`,
/// 3. the time is one of the canonical slots,
/// 4. the block-time service does not report the slot as blocked.
#[derive(Debug, Clone)]
pub struct ValidationPipeline {
    block_times: Arc<dyn BlockTimeService>,
    deadline: Deadline,
}

impl ValidationPipeline {
    /// Creates a pipeline backed by the given block-time service.
    #[must_use]
    pub fn new(block_times: Arc<dyn BlockTimeService>, deadline: Deadline) -> Self {
        Self {
            block_times,
            deadline,
        }
    }

    /// Validates `date` and `time` against the current shop time.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidDateTime`], [`BookingError::OutOfRange`],
    /// [`BookingError::InvalidSlot`] or [`BookingError::SlotBlocked`] for the
    /// first violated rule, or a gateway error if the block-time lookup fails.
    pub async fn validate(&self, date: &str, time: &str) -> Result<Slot, BookingError> {
        self.validate_at(date, time, now_in_shop()).await
    }

    /// Validates `date` and `time` as if the current shop time were `now`.
    ///
    /// # Errors
    ///
    /// See [`ValidationPipeline::validate`].
    pub async fn validate_at(
        &self,
        date: &str,
        time: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<Slot, BookingError> {
        let slot = Slot::parse(date, time).ok_or(BookingError::InvalidDateTime)?;

        if !slot.is_within_window(now) {
            return Err(BookingError::OutOfRange);
        }

        if !is_canonical_slot(time) {
            return Err(BookingError::InvalidSlot);
        }

        let blocked = self
            .deadline
            .bound("block time service", self.block_times.is_blocked(date, time))
            .await?;
        if blocked {
            return Err(BookingError::SlotBlocked);
        }

        Ok(slot)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::service::test_support::{FakeBlockTimes, TEST_DEADLINE, shop_date};
    use chrono::TimeZone;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn pipeline(fake: &Arc<FakeBlockTimes>) -> ValidationPipeline {
        let block_times: Arc<dyn BlockTimeService> = Arc::clone(fake) as Arc<dyn BlockTimeService>;
        ValidationPipeline::new(block_times, TEST_DEADLINE)
    }

    #[tokio::test]
    async fn accepts_a_free_slot_tomorrow() {
        let fake = Arc::new(FakeBlockTimes::default());
        let result = pipeline(&fake).validate(&shop_date(1), "10:00").await;
        let Ok(slot) = result else {
            panic!("expected a valid slot");
        };
        assert_eq!(slot.time(), "10:00");
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unparsable_input_is_invalid_date_time() {
        let fake = Arc::new(FakeBlockTimes::default());
        for (date, time) in [("20-10-2026", "10:00"), ("2026-02-30", "10:00"), ("2026-10-20", "noon")] {
            let result = pipeline(&fake).validate(date, time).await;
            assert!(matches!(result, Err(BookingError::InvalidDateTime)), "{date} {time}");
        }
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dates_outside_the_window_are_out_of_range() {
        let fake = Arc::new(FakeBlockTimes::default());
        for offset in [-1, 7, 30] {
            let result = pipeline(&fake).validate(&shop_date(offset), "10:00").await;
            assert!(matches!(result, Err(BookingError::OutOfRange)), "offset {offset}");
        }
    }

    #[tokio::test]
    async fn window_edges_are_inclusive() {
        let fake = Arc::new(FakeBlockTimes::default());
        let Some(now) = crate::domain::schedule::shop_timezone()
            .with_ymd_and_hms(2026, 10, 19, 10, 0, 0)
            .single()
        else {
            panic!("valid timestamp");
        };
        let at = |date: &'static str| {
            let p = pipeline(&fake);
            async move { p.validate_at(date, "10:00", now).await }
        };
        assert!(at("2026-10-19").await.is_ok());
        assert!(at("2026-10-25").await.is_ok());
        assert!(matches!(at("2026-10-26").await, Err(BookingError::OutOfRange)));
    }

    #[tokio::test]
    async fn off_table_times_are_invalid_slots() {
        let fake = Arc::new(FakeBlockTimes::default());
        for time in ["10:15", "07:30", "20:30", "12:01"] {
            let result = pipeline(&fake).validate(&shop_date(2), time).await;
            assert!(matches!(result, Err(BookingError::InvalidSlot)), "{time}");
        }
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blocked_slot_is_rejected() {
        let date = shop_date(3);
        let fake = Arc::new(FakeBlockTimes::blocking(&date, "14:00"));
        let result = pipeline(&fake).validate(&date, "14:00").await;
        assert!(matches!(result, Err(BookingError::SlotBlocked)));
        let result = pipeline(&fake).validate(&date, "14:30").await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_block_time_service_is_unavailable() {
        let fake = Arc::new(FakeBlockTimes {
            delay: Some(Duration::from_secs(60)),
            ..FakeBlockTimes::default()
        });
        let result = pipeline(&fake).validate(&shop_date(1), "10:00").await;
        assert!(matches!(result, Err(BookingError::GatewayUnavailable(_))));
    }
}
