//! DOS date/time handling for ZIP entries.
//!
//! This module provides the [`Timestamp`] type for the modification times
//! stored in ZIP local and central directory headers.
//!
//! # Precision
//!
//! The ZIP format stores timestamps as MS-DOS date/time pairs:
//! - Years 1980 through 2107
//! - 2-second resolution (odd seconds cannot be represented)
//! - No time zone; the value is whatever local time the archiver used
//!
//! Conversions to Unix time treat the stored value as UTC.
//!
//! # Example
//!
//! ```rust
//! use lovepatch::Timestamp;
//!
//! let ts = Timestamp::new(2000, 1, 1, 0, 0, 0).unwrap();
//! assert_eq!(ts.to_string(), "2000-01-01 00:00:00");
//! assert_eq!(ts.as_unix_secs(), Some(946_684_800));
//! ```

use chrono::{NaiveDate, NaiveDateTime};

/// First year representable in a DOS date.
const DOS_MIN_YEAR: u16 = 1980;

/// Last year representable in a DOS date.
const DOS_MAX_YEAR: u16 = 2107;

/// A ZIP entry modification time.
///
/// Holds the broken-down calendar fields exactly as they were decoded, so a
/// timestamp read from one archive can be written to another unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl Timestamp {
    /// Creates a timestamp from calendar fields.
    ///
    /// Returns `None` when the fields fall outside the DOS date/time range.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        let ts = Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        };
        ts.is_valid().then_some(ts)
    }

    /// Creates a timestamp from a `zip` crate date/time.
    pub fn from_zip(datetime: zip::DateTime) -> Self {
        Self {
            year: datetime.year(),
            month: datetime.month(),
            day: datetime.day(),
            hour: datetime.hour(),
            minute: datetime.minute(),
            second: datetime.second(),
        }
    }

    /// Converts back to a `zip` crate date/time.
    ///
    /// Returns `None` if the `zip` crate rejects the fields.
    pub fn to_zip(&self) -> Option<zip::DateTime> {
        zip::DateTime::from_date_and_time(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
        .ok()
    }

    /// Converts to a calendar date and time.
    ///
    /// Returns `None` when the stored fields do not name a real instant,
    /// such as February 30th read from a damaged header.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::try_from(self.to_zip()?).ok()
    }

    /// Returns the timestamp as Unix seconds, interpreting it as UTC.
    pub fn as_unix_secs(&self) -> Option<i64> {
        self.to_naive().map(|dt| dt.and_utc().timestamp())
    }

    /// Returns the year.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Returns the day of month (1-31).
    pub fn day(&self) -> u8 {
        self.day
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the second (0-59).
    pub fn second(&self) -> u8 {
        self.second
    }

    fn is_valid(&self) -> bool {
        (DOS_MIN_YEAR..=DOS_MAX_YEAR).contains(&self.year)
            && NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())
                .and_then(|date| {
                    date.and_hms_opt(self.hour.into(), self.minute.into(), self.second.into())
                })
                .is_some()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl From<zip::DateTime> for Timestamp {
    fn from(datetime: zip::DateTime) -> Self {
        Self::from_zip(datetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dos_epoch() {
        let ts = Timestamp::new(1980, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(ts.as_unix_secs(), Some(315_532_800));
    }

    #[test]
    fn test_known_date() {
        // 2023-11-14 22:13:20 UTC
        let ts = Timestamp::new(2023, 11, 14, 22, 13, 20).unwrap();
        assert_eq!(ts.as_unix_secs(), Some(1_700_000_000));
        assert_eq!(
            ts.to_naive().unwrap(),
            NaiveDate::from_ymd_opt(2023, 11, 14)
                .unwrap()
                .and_hms_opt(22, 13, 20)
                .unwrap()
        );
    }

    #[test]
    fn test_leap_day() {
        let ts = Timestamp::new(2024, 2, 29, 12, 0, 0).unwrap();
        assert_eq!(ts.as_unix_secs(), Some(1_709_208_000));
        assert!(Timestamp::new(2023, 2, 29, 12, 0, 0).is_none());
    }

    #[test]
    fn test_out_of_range() {
        assert!(Timestamp::new(1979, 12, 31, 23, 59, 58).is_none());
        assert!(Timestamp::new(2108, 1, 1, 0, 0, 0).is_none());
        assert!(Timestamp::new(2000, 13, 1, 0, 0, 0).is_none());
        assert!(Timestamp::new(2000, 4, 31, 0, 0, 0).is_none());
        assert!(Timestamp::new(2000, 1, 1, 24, 0, 0).is_none());
    }

    #[test]
    fn test_last_representable_second() {
        let ts = Timestamp::new(2107, 12, 31, 23, 59, 58).unwrap();
        assert_eq!(ts.as_unix_secs(), Some(4_354_819_198));
    }

    #[test]
    fn test_zip_roundtrip() {
        let ts = Timestamp::new(2021, 6, 15, 8, 30, 42).unwrap();
        let datetime = ts.to_zip().unwrap();
        assert_eq!(Timestamp::from_zip(datetime), ts);
    }

    #[test]
    fn test_display() {
        let ts = Timestamp::new(2009, 7, 3, 4, 5, 6).unwrap();
        assert_eq!(ts.to_string(), "2009-07-03 04:05:06");
    }
}
