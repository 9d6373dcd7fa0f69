//! Creation timestamps.
//!
//! A new container records when it was made in its metadata entry, as a
//! human-readable local time with microsecond precision:
//!
//! ```text
//! Created: 2026-10-16 14:03:27.512904
//! ```
//!
//! ZIP entry headers additionally carry an MS-DOS timestamp (two-second
//! precision, years 1980-2107); [`Timestamp::to_zip`] converts to it.

use chrono::{DateTime, Datelike, Local, Timelike};

/// Prefix of the creation-timestamp text.
pub const CREATED_PREFIX: &str = "Created: ";

/// A local wall-clock timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Local>);

impl Timestamp {
    /// Captures the current local time.
    pub fn now() -> Self {
        Self(Local::now())
    }

    /// Wraps an existing time.
    pub fn from_datetime(dt: DateTime<Local>) -> Self {
        Self(dt)
    }

    /// Returns the wrapped time.
    pub fn as_datetime(&self) -> DateTime<Local> {
        self.0
    }

    /// Formats the contents of the creation-timestamp entry.
    pub fn created_at_text(&self) -> String {
        format!(
            "{}{}",
            CREATED_PREFIX,
            self.0.format("%Y-%m-%d %H:%M:%S%.6f")
        )
    }

    /// Converts to a ZIP header timestamp.
    ///
    /// Times outside the DOS range fall back to 1980-01-01 00:00:00.
    pub fn to_zip(&self) -> zip::DateTime {
        let Ok(year) = u16::try_from(self.0.year()) else {
            return zip::DateTime::default();
        };
        zip::DateTime::from_date_and_time(
            year,
            self.0.month() as u8,
            self.0.day() as u8,
            self.0.hour() as u8,
            self.0.minute() as u8,
            self.0.second() as u8,
        )
        .unwrap_or_default()
    }
}
