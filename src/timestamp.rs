//! Lightweight ISO-8601 style timestamps.
//!
//! A [`Timestamp`] is a local date with an optional time of day. It parses
//! database style strings such as `2024-03-15 09:30:00` or
//! `2024-03-15T09:30:00`, prints them back in the same shape with
//! configurable separators, and supports simple calendar adjustments.
//!
//! ```
//! use badger::timestamp::Timestamp;
//!
//! let ts: Timestamp = "2024-01-31 09:05:00".parse().unwrap();
//! assert_eq!(ts.date(), "2024-01-31");
//! assert_eq!(ts.time(), "09:05:00");
//! assert_eq!(ts.add_months(1).unwrap().to_string(), "2024-02-29 09:05:00");
//! ```

use chrono::{
    DateTime, Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike,
};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("Invalid timestamp: {0}")]
    Invalid(String),

    #[error("Timestamp out of range")]
    OutOfRange,
}

/// Separators used when printing a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampFormat {
    /// Between the date and the time.
    pub joint: String,
    /// Between year, month and day.
    pub date_joint: String,
    /// Between hours, minutes and seconds.
    pub time_joint: String,
}

impl Default for StampFormat {
    fn default() -> Self {
        Self {
            joint: " ".to_string(),
            date_joint: "-".to_string(),
            time_joint: ":".to_string(),
        }
    }
}

/// The numeric parts of a timestamp string. The time parts are present
/// together or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub time: Option<(u32, u32, u32)>,
}

/// Reads `YYYY?M?D` with an optional `(T|space)H?MM?SS` after it. Any
/// non-digit separates the numbers and trailing text is ignored.
struct StampScanner<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> StampScanner<'a> {
    fn digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let start = self.position;
        while self.position < self.bytes.len()
            && self.position - start < max
            && self.bytes[self.position].is_ascii_digit()
        {
            self.position += 1;
        }
        if self.position - start < min {
            return None;
        }
        std::str::from_utf8(&self.bytes[start..self.position])
            .ok()?
            .parse()
            .ok()
    }

    fn separator(&mut self, accept: impl Fn(u8) -> bool) -> Option<()> {
        let byte = *self.bytes.get(self.position)?;
        if accept(byte) {
            self.position += 1;
            Some(())
        } else {
            None
        }
    }

    fn date(&mut self) -> Option<(i32, u32, u32)> {
        let year = self.digits(4, 4)?;
        self.separator(|b| !b.is_ascii_digit())?;
        let month = self.digits(1, 2)?;
        self.separator(|b| !b.is_ascii_digit())?;
        let day = self.digits(1, 2)?;
        Some((i32::try_from(year).ok()?, month, day))
    }

    fn time(&mut self) -> Option<(u32, u32, u32)> {
        self.separator(|b| b == b'T' || b.is_ascii_whitespace())?;
        let hours = self.digits(1, 2)?;
        self.separator(|b| !b.is_ascii_digit())?;
        let minutes = self.digits(2, 2)?;
        self.separator(|b| !b.is_ascii_digit())?;
        let seconds = self.digits(2, 2)?;
        Some((hours, minutes, seconds))
    }
}

/// Splits a timestamp string into its numeric parts without validating them.
///
/// ```
/// use badger::timestamp::split_timestamp;
///
/// let parts = split_timestamp("2024-3-5T7:08:09Z").unwrap();
/// assert_eq!((parts.year, parts.month, parts.day), (2024, 3, 5));
/// assert_eq!(parts.time, Some((7, 8, 9)));
/// ```
pub fn split_timestamp(text: &str) -> Option<StampParts> {
    let trimmed = text.trim_start();
    let mut scanner = StampScanner {
        bytes: trimmed.as_bytes(),
        position: 0,
    };
    let (year, month, day) = scanner.date()?;
    let time = scanner.time();
    Some(StampParts {
        year,
        month,
        day,
        time,
    })
}

/// Whether `text` starts with something shaped like a timestamp.
pub fn is_timestamp(text: &str) -> bool {
    split_timestamp(text).is_some()
}

/// A local date with an optional time of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    date: NaiveDate,
    time: Option<NaiveTime>,
    format: StampFormat,
}

impl Timestamp {
    /// The current local date and time, to the second.
    pub fn now() -> Self {
        Self::from(Local::now().naive_local())
    }

    /// Parses a timestamp string such as `2024-03-15 09:30:00` or
    /// `2024-03-15`. Falls back to RFC 3339 and RFC 2822 strings, which are
    /// converted to local time.
    pub fn parse(text: &str) -> Result<Self, TimestampError> {
        let invalid = || TimestampError::Invalid(text.to_string());

        if let Some(parts) = split_timestamp(text) {
            let date = NaiveDate::from_ymd_opt(parts.year, parts.month, parts.day)
                .ok_or_else(invalid)?;
            let time = match parts.time {
                Some((h, m, s)) => Some(NaiveTime::from_hms_opt(h, m, s).ok_or_else(invalid)?),
                None => None,
            };
            return Ok(Self::from_parts(date, time));
        }

        let text = text.trim();
        DateTime::parse_from_rfc3339(text)
            .or_else(|_| DateTime::parse_from_rfc2822(text))
            .map(|dt| Self::from(dt.with_timezone(&Local).naive_local()))
            .map_err(|_| invalid())
    }

    /// Seconds since the Unix epoch, in local time.
    pub fn from_unix(secs: i64) -> Result<Self, TimestampError> {
        Local
            .timestamp_opt(secs, 0)
            .single()
            .map(|dt| Self::from(dt.naive_local()))
            .ok_or(TimestampError::OutOfRange)
    }

    /// Milliseconds since the Unix epoch, in local time.
    pub fn from_millis(ms: i64) -> Result<Self, TimestampError> {
        Local
            .timestamp_millis_opt(ms)
            .single()
            .map(|dt| Self::from(dt.naive_local()))
            .ok_or(TimestampError::OutOfRange)
    }

    fn from_parts(date: NaiveDate, time: Option<NaiveTime>) -> Self {
        Self {
            date,
            time,
            format: StampFormat::default(),
        }
    }

    /// Sets the separators used when printing.
    pub fn with_format(mut self, format: StampFormat) -> Self {
        self.format = format;
        self
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn has_time(&self) -> bool {
        self.time.is_some()
    }

    /// `YYYY-MM-DD` with the configured date separator.
    pub fn date(&self) -> String {
        self.date_with(&self.format.date_joint)
    }

    pub fn date_with(&self, joint: &str) -> String {
        format!(
            "{:04}{joint}{:02}{joint}{:02}",
            self.date.year(),
            self.date.month(),
            self.date.day(),
        )
    }

    /// `HH:MM:SS` with the configured time separator; midnight for a date
    /// without a time.
    pub fn time(&self) -> String {
        self.time_with(&self.format.time_joint)
    }

    pub fn time_with(&self, joint: &str) -> String {
        let time = self.time.unwrap_or(NaiveTime::MIN);
        format!(
            "{:02}{joint}{:02}{joint}{:02}",
            time.hour(),
            time.minute(),
            time.second(),
        )
    }

    /// The date, followed by the time when there is one.
    pub fn stamp(&self) -> String {
        self.stamp_with(&self.format)
    }

    pub fn stamp_with(&self, format: &StampFormat) -> String {
        let date = self.date_with(&format.date_joint);
        match self.time {
            Some(_) => format!("{}{}{}", date, format.joint, self.time_with(&format.time_joint)),
            None => date,
        }
    }

    pub fn add_days(&self, days: i64) -> Result<Self, TimestampError> {
        let magnitude = Days::new(days.unsigned_abs());
        let date = if days >= 0 {
            self.date.checked_add_days(magnitude)
        } else {
            self.date.checked_sub_days(magnitude)
        };
        self.with_date(date)
    }

    /// Moves by whole months, clamping the day to the end of a shorter month.
    pub fn add_months(&self, months: i32) -> Result<Self, TimestampError> {
        let magnitude = Months::new(months.unsigned_abs());
        let date = if months >= 0 {
            self.date.checked_add_months(magnitude)
        } else {
            self.date.checked_sub_months(magnitude)
        };
        self.with_date(date)
    }

    pub fn add_years(&self, years: i32) -> Result<Self, TimestampError> {
        let months = years.checked_mul(12).ok_or(TimestampError::OutOfRange)?;
        self.add_months(months)
    }

    fn with_date(&self, date: Option<NaiveDate>) -> Result<Self, TimestampError> {
        Ok(Self {
            date: date.ok_or(TimestampError::OutOfRange)?,
            ..self.clone()
        })
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        let time = NaiveTime::from_hms_opt(dt.hour(), dt.minute(), dt.second());
        Self::from_parts(dt.date(), time)
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(date: NaiveDate) -> Self {
        Self::from_parts(date, None)
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stamp())
    }
}
