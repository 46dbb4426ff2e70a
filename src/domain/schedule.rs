//! Shop calendar: fixed timezone, canonical slot table and timestamp formats.
//!
//! All booking times are interpreted in the shop's timezone
//! (Asia/Ho_Chi_Minh, UTC+7 with no daylight saving), so a fixed offset is
//! exact.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, Utc};

/// UTC offset of the shop's timezone in seconds.
pub const SHOP_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// Bookings are accepted from now up to this many days ahead (inclusive).
pub const BOOKING_WINDOW_DAYS: i64 = 6;

/// First bookable time of day, in minutes after midnight (08:00).
pub const FIRST_SLOT_MINUTES: u32 = 8 * 60;

/// Last bookable time of day, in minutes after midnight (20:00).
pub const LAST_SLOT_MINUTES: u32 = 20 * 60;

/// Distance between two consecutive slots.
pub const SLOT_STEP_MINUTES: u32 = 30;

const REQUEST_FORMAT: &str = "%Y-%m-%d %H:%M";
const SCHEDULE_FORMAT: &str = "%Y-%m-%d %H:%M";
const ORDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the shop's fixed timezone.
#[must_use]
pub fn shop_timezone() -> FixedOffset {
    FixedOffset::east_opt(SHOP_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current instant in the shop's timezone.
#[must_use]
pub fn now_in_shop() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&shop_timezone())
}

/// Generates the canonical, ordered table of bookable times of day
/// (`"08:00"`, `"08:30"`, ..., `"20:00"`).
///
/// Validation and availability both rely on this exact table.
#[must_use]
pub fn time_slots() -> Vec<String> {
    (FIRST_SLOT_MINUTES..=LAST_SLOT_MINUTES)
        .step_by(SLOT_STEP_MINUTES as usize)
        .map(|minutes| format!("{:02}:{:02}", minutes / 60, minutes % 60))
        .collect()
}

/// Returns `true` if `time` is a member of [`time_slots`].
#[must_use]
pub fn is_canonical_slot(time: &str) -> bool {
    time_slots().iter().any(|slot| slot == time)
}

/// A requested (date, time-of-day) pair pinned to the shop's timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    date: String,
    time: String,
    starts_at: DateTime<FixedOffset>,
}

impl Slot {
    /// Parses `date` (`yyyy-MM-dd`) and `time` (`HH:mm`) as a shop-local
    /// timestamp. Returns `None` when the pair is not a valid timestamp.
    #[must_use]
    pub fn parse(date: &str, time: &str) -> Option<Self> {
        let naive = NaiveDateTime::parse_from_str(&format!("{date} {time}"), REQUEST_FORMAT).ok()?;
        let starts_at = naive.and_local_timezone(shop_timezone()).single()?;
        Some(Self {
            date: date.to_string(),
            time: time.to_string(),
            starts_at,
        })
    }

    /// The requested date, as supplied.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// The requested time of day, as supplied.
    #[must_use]
    pub fn time(&self) -> &str {
        &self.time
    }

    /// The slot's start instant.
    #[must_use]
    pub const fn starts_at(&self) -> DateTime<FixedOffset> {
        self.starts_at
    }

    /// Schedule string stored with a staged booking: `date + " " + time`.
    #[must_use]
    pub fn schedule(&self) -> String {
        format!("{} {}", self.date, self.time)
    }

    /// Returns `true` if the slot falls in `[now, now + 6 days]`.
    #[must_use]
    pub fn is_within_window(&self, now: DateTime<FixedOffset>) -> bool {
        self.starts_at >= now && self.starts_at <= now + Duration::days(BOOKING_WINDOW_DAYS)
    }
}

/// Formats a persisted schedule as `yyyy-MM-dd HH:mm` in shop time.
#[must_use]
pub fn format_schedule(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&shop_timezone())
        .format(SCHEDULE_FORMAT)
        .to_string()
}

/// Formats an order timestamp as `yyyy-MM-dd HH:mm:ss` in shop time.
#[must_use]
pub fn format_order_time<Tz: chrono::TimeZone>(instant: DateTime<Tz>) -> String {
    instant
        .with_timezone(&shop_timezone())
        .format(ORDER_TIME_FORMAT)
        .to_string()
}
