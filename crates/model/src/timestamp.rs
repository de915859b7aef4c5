//! Telemetry timestamps
//!
//! Timestamps arrive as ISO-8601-like strings (`2025-11-03T20:00:00`,
//! optionally followed by fractional seconds or an offset). Only the
//! `%Y-%m-%dT%H:%M:%S` prefix is interpreted; anything after it is ignored,
//! so the offset of `timestamp_local` never shifts the displayed wall time.

use chrono::{Datelike, NaiveDateTime};

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Error returned for a string that does not start with a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unparsable timestamp {raw:?}")]
pub struct TimestampError {
    /// The rejected input
    pub raw: String,
}

/// A parsed wall-clock timestamp (no time zone attached)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Parse the `%Y-%m-%dT%H:%M:%S` prefix of `raw`
    pub fn parse(raw: &str) -> Result<Self, TimestampError> {
        NaiveDateTime::parse_and_remainder(raw.trim(), FORMAT)
            .map(|(dt, _rest)| Self(dt))
            .map_err(|_| TimestampError { raw: raw.to_owned() })
    }

    /// Underlying date-time
    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Signed seconds from `earlier` to `self`
    pub fn seconds_since(&self, earlier: &Timestamp) -> i64 {
        self.0.signed_duration_since(earlier.0).num_seconds()
    }

    /// Clock text, `HH:MM`
    pub fn clock_text(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    /// Calendar text, e.g. `Tuesday 21st October 2025`
    pub fn nice_date(&self) -> String {
        let day = self.0.day();
        format!(
            "{} {}{} {} {}",
            self.0.format("%A"),
            day,
            ordinal_suffix(day),
            self.0.format("%B"),
            self.0.year()
        )
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}
