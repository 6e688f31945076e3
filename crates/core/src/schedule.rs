//! Caller-local calendar windows for the dashboard.

use chrono::{Duration, FixedOffset, NaiveTime};

use crate::types::Timestamp;

/// Smallest UTC offset in use (UTC-12:00), in minutes.
pub const MIN_OFFSET_MINUTES: i32 = -12 * 60;
/// Largest UTC offset in use (UTC+14:00), in minutes.
pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Half-open UTC interval `[start, end)` covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DayWindow {
    /// The local day (under `offset`) that contains the instant `now`.
    pub fn containing(now: Timestamp, offset: FixedOffset) -> Self {
        let local_midnight = now
            .with_timezone(&offset)
            .date_naive()
            .and_time(NaiveTime::MIN);
        let start = (local_midnight - Duration::seconds(i64::from(offset.local_minus_utc())))
            .and_utc();
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    pub fn contains(&self, instant: Timestamp) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Build an offset from minutes east of UTC, rejecting values outside the
/// range of real-world zones.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    if !(MIN_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(minutes * 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn utc_day_spans_midnight_to_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 15, 30, 0).unwrap();
        let window = DayWindow::containing(now, FixedOffset::east_opt(0).unwrap());
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 5, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn positive_offset_can_already_be_tomorrow() {
        // 22:00 UTC is 07:00 the next day in UTC+9.
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 22, 0, 0).unwrap();
        let window = DayWindow::containing(now, offset_from_minutes(9 * 60).unwrap());
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 5, 1, 15, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 5, 2, 15, 0, 0).unwrap());
    }

    #[test]
    fn negative_offset_can_still_be_yesterday() {
        // 02:00 UTC is 21:00 the previous day in UTC-5.
        let now = Utc.with_ymd_and_hms(2026, 5, 2, 2, 0, 0).unwrap();
        let window = DayWindow::containing(now, offset_from_minutes(-5 * 60).unwrap());
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 5, 1, 5, 0, 0).unwrap());
        assert!(window.contains(now));
    }

    #[test]
    fn window_is_half_open() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
        let window = DayWindow::containing(now, FixedOffset::east_opt(0).unwrap());
        assert!(window.contains(window.start));
        assert!(!window.contains(window.end));
    }

    #[test]
    fn out_of_range_offsets_are_rejected() {
        assert!(offset_from_minutes(15 * 60).is_none());
        assert!(offset_from_minutes(-13 * 60).is_none());
        assert!(offset_from_minutes(330).is_some());
    }
}
