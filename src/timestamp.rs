use std::cmp::Ordering;
use std::fmt::Display;

use chrono::{DateTime, FixedOffset, TimeZone};

/// A point in time together with the timezone offset it was recorded in.
///
/// Two timestamps are equal only if both the instant and the offset match, so `1000 +0100` and
/// `1000 -0500` differ. Ordering is by instant first, then by offset. Use [`Timestamp::unix`] or
/// the inner `DateTime` to compare instants alone.
#[derive(Debug, Clone)]
pub struct Timestamp(pub DateTime<FixedOffset>);

impl Timestamp {
    fn offset_seconds(&self) -> i32 {
        self.0.offset().local_minus_utc()
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.offset_seconds() == other.offset_seconds()
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .cmp(&other.0)
            .then_with(|| self.offset_seconds().cmp(&other.offset_seconds()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampError {
    Seconds,
    Offset,
}

impl Timestamp {
    /// Build a timestamp from the two trailing tokens of a git signature line, e.g.
    /// `("1658312219", "+0100")`.
    pub fn from_git(unix: &str, offset: &str) -> Result<Self, TimestampError> {
        let unix: i64 = unix.parse().map_err(|_| TimestampError::Seconds)?;
        let offset = parse_offset(offset).ok_or(TimestampError::Offset)?;
        let when = offset
            .timestamp_opt(unix, 0)
            .single()
            .ok_or(TimestampError::Seconds)?;
        Ok(Self(when))
    }

    pub fn unix(&self) -> i64 {
        self.0.timestamp()
    }
}

/// `[+-]HHMM` to a fixed offset, read with chrono's `%z`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    DateTime::parse_from_str(&format!("0 {s}"), "%s %z")
        .ok()
        .map(|when| *when.offset())
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%s %z"))
    }
}
