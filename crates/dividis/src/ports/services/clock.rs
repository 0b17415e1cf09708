//! Clock Port
//!
//! Source of the current instant and of the server-local calendar.

use chrono::{DateTime, Local, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Server-local calendar date of `instant`, using the offset in force at
    /// that instant
    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate;
}

/// Wall clock in the server's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&Local).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_system_clock_matches_local_calendar() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 30, 0, 30, 0).unwrap();
        assert_eq!(
            SystemClock.local_date(instant),
            Local.from_utc_datetime(&instant.naive_utc()).date_naive()
        );
    }
}
