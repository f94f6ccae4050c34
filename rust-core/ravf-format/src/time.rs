// SPDX-License-Identifier: PMPL-1.0-or-later
//
// RAVF container format - Timestamp helpers
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RAVF timestamps count nanoseconds since 2010-01-01T00:00:00 UTC. The
// conversions here are plain elapsed-time arithmetic: no leap seconds are
// inserted or removed.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Seconds between the Unix epoch and the RAVF epoch (2010-01-01T00:00:00Z).
pub const RAVF_EPOCH_UNIX_SECONDS: i64 = 1_262_304_000;

/// The RAVF epoch as a UTC datetime.
pub fn ravf_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(RAVF_EPOCH_UNIX_SECONDS, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Convert a RAVF nanosecond timestamp to a UTC datetime.
pub fn timestamp_to_datetime(timestamp: u64) -> DateTime<Utc> {
    let seconds = (timestamp / NANOS_PER_SECOND) as i64;
    let nanos = (timestamp % NANOS_PER_SECOND) as i64;
    ravf_epoch() + Duration::seconds(seconds) + Duration::nanoseconds(nanos)
}

/// Convert a UTC datetime to a RAVF nanosecond timestamp.
///
/// Returns `None` for instants before the RAVF epoch or too far in the
/// future to fit in a u64.
pub fn datetime_to_timestamp(datetime: DateTime<Utc>) -> Option<u64> {
    let elapsed = datetime.signed_duration_since(ravf_epoch());
    let nanos = elapsed.num_nanoseconds()?;
    u64::try_from(nanos).ok()
}

/// Split a RAVF timestamp into its calendar date and time of day.
pub fn timestamp_to_calendar(timestamp: u64) -> (NaiveDate, NaiveTime) {
    let datetime = timestamp_to_datetime(timestamp).naive_utc();
    (datetime.date(), datetime.time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_epoch_is_2010() {
        let epoch = ravf_epoch();
        assert_eq!((epoch.year(), epoch.month(), epoch.day()), (2010, 1, 1));
        assert_eq!(epoch.num_seconds_from_midnight(), 0);
        assert_eq!(timestamp_to_datetime(0), epoch);
    }

    #[test]
    fn test_calendar_split_keeps_nanoseconds() {
        // 1 day, 1 hour, 1 minute, 1.5 seconds and 7 ns past the epoch.
        let timestamp = (86_400 + 3_600 + 60 + 1) * NANOS_PER_SECOND + 500_000_007;
        let (date, time) = timestamp_to_calendar(timestamp);
        assert_eq!(date, NaiveDate::from_ymd_opt(2010, 1, 2).unwrap());
        assert_eq!((time.hour(), time.minute(), time.second()), (1, 1, 1));
        assert_eq!(time.nanosecond(), 500_000_007);
    }

    #[test]
    fn test_leap_year_arithmetic() {
        // 2012-02-29T00:00:00Z is 789 days after the epoch.
        let timestamp = 789 * 86_400 * NANOS_PER_SECOND;
        let (date, _) = timestamp_to_calendar(timestamp);
        assert_eq!(date, NaiveDate::from_ymd_opt(2012, 2, 29).unwrap());
    }

    #[test]
    fn test_datetime_roundtrip() {
        let datetime = Utc.with_ymd_and_hms(2024, 6, 1, 22, 15, 3).unwrap();
        let timestamp = datetime_to_timestamp(datetime).unwrap();
        assert_eq!(timestamp_to_datetime(timestamp), datetime);
    }

    #[test]
    fn test_before_epoch_has_no_timestamp() {
        let datetime = Utc.with_ymd_and_hms(2009, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(datetime_to_timestamp(datetime), None);
    }
}
