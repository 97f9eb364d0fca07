use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Format of the `Timestamp` line body: local wall-clock time followed by the
/// numeric offset, e.g. `2024-03-01 14:05:09 +0530`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Wall-clock time of a commit, pinned to a fixed UTC offset.
///
/// The rendered local time always agrees with the rendered offset: `now`
/// converts the current instant into the configured offset before formatting.
/// Precision is whole seconds, matching the serialized form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommitTimestamp(DateTime<FixedOffset>);

impl CommitTimestamp {
    /// The current instant, expressed in `offset`.
    pub fn now(offset: FixedOffset) -> Self {
        Self::from_utc(Utc::now(), offset)
    }

    /// A specific instant, expressed in `offset`.
    pub fn from_utc(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = instant.with_timezone(&offset);
        // Drop sub-second precision so that render -> parse is lossless.
        let secs = local.timestamp();
        let truncated = DateTime::from_timestamp(secs, 0)
            .unwrap_or(instant)
            .with_timezone(&offset);
        Self(truncated)
    }

    /// Parse the `YYYY-MM-DD HH:MM:SS +HHMM` form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        DateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
            .map(Self)
            .map_err(|_| TypeError::InvalidTimestamp(s.to_string()))
    }

    /// Seconds since the UNIX epoch.
    pub fn unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// The fixed offset this timestamp is expressed in.
    pub fn offset(&self) -> FixedOffset {
        *self.0.offset()
    }

    /// The underlying `chrono` value.
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }
}

impl fmt::Debug for CommitTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitTimestamp({self})")
    }
}

impl fmt::Display for CommitTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

/// Parse a `+HHMM` / `-HHMM` offset (a colon between hours and minutes is
/// tolerated).
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, TypeError> {
    let invalid = || TypeError::InvalidOffset(s.to_string());
    let trimmed = s.trim();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ist() -> FixedOffset {
        parse_utc_offset("+0530").unwrap()
    }

    #[test]
    fn renders_local_time_with_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 8, 35, 9).unwrap();
        let ts = CommitTimestamp::from_utc(instant, ist());
        assert_eq!(ts.to_string(), "2024-03-01 14:05:09 +0530");
    }

    #[test]
    fn parse_roundtrip() {
        let ts = CommitTimestamp::now(ist());
        let parsed = CommitTimestamp::parse(&ts.to_string()).unwrap();
        assert_eq!(parsed, ts);
        assert_eq!(parsed.unix_seconds(), ts.unix_seconds());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(CommitTimestamp::parse("yesterday").is_err());
        assert!(CommitTimestamp::parse("2024-03-01 14:05:09").is_err());
    }

    #[test]
    fn offsets_parse() {
        assert_eq!(parse_utc_offset("+0000").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("+05:30").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_utc_offset("-0800").unwrap().local_minus_utc(), -28800);
    }

    #[test]
    fn offsets_reject_bad_input() {
        assert!(parse_utc_offset("0530").is_err());
        assert!(parse_utc_offset("+5").is_err());
        assert!(parse_utc_offset("+0575").is_err());
        assert!(parse_utc_offset("").is_err());
    }

    #[test]
    fn now_is_recent() {
        let ts = CommitTimestamp::now(ist());
        // After 2020-01-01.
        assert!(ts.unix_seconds() > 1_577_836_800);
        assert_eq!(ts.offset(), ist());
    }
}
