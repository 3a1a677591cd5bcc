//! Due-date codec
//!
//! Users write due dates as `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM` in the
//! configured display zone; the backend stores RFC 3339 timestamps.
//!
//! Decoding renders date-only whenever the local time is exactly midnight, so
//! a task due at 00:00 looks the same as one with no time of day.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_TIME_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

const DATE_SHAPE: &str = "dddd-dd-dd";
const DATE_TIME_INPUT_SHAPE: &str = "dddd-dd-ddTdd:dd";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DueError {
    #[error("invalid due format {0:?}, expected YYYY-MM-DD or YYYY-MM-DDTHH:MM")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timezone {0:?}, expected UTC, an IANA name or an offset like +04:00")]
pub struct ZoneParseError(String);

/// Zone in which due dates are read and shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    #[default]
    Utc,
    Fixed(FixedOffset),
    Named(Tz),
}

impl FromStr for DisplayZone {
    type Err = ZoneParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(DisplayZone::Utc);
        }
        if let Some(offset) = parse_offset(s) {
            return Ok(DisplayZone::Fixed(offset));
        }
        s.parse::<Tz>()
            .map(DisplayZone::Named)
            .map_err(|_| ZoneParseError(s.to_string()))
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayZone::Utc => f.write_str("UTC"),
            DisplayZone::Fixed(offset) => write!(f, "{}", offset),
            DisplayZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// Parse `+HH:MM` / `-HH:MM`
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Convert user input into an RFC 3339 timestamp in `zone`
///
/// A zero offset is written as `Z`.
pub fn encode_due(input: &str, zone: &DisplayZone) -> Result<String, DueError> {
    let naive = parse_user_input(input).ok_or_else(|| DueError::InvalidFormat(input.to_string()))?;

    Ok(match zone {
        DisplayZone::Utc => encode_in(&Utc, naive),
        DisplayZone::Fixed(offset) => encode_in(offset, naive),
        DisplayZone::Named(tz) => encode_in(tz, naive),
    })
}

/// Convert a backend timestamp into display form in `zone`
///
/// Returns the input unchanged if it is not a valid RFC 3339 timestamp.
pub fn decode_due(timestamp: &str, zone: &DisplayZone) -> String {
    let parsed = match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) if is_canonical_rfc3339(timestamp) => parsed,
        _ => return timestamp.to_string(),
    };

    match zone {
        DisplayZone::Utc => render(&parsed.with_timezone(&Utc)),
        DisplayZone::Fixed(offset) => render(&parsed.with_timezone(offset)),
        DisplayZone::Named(tz) => render(&parsed.with_timezone(tz)),
    }
}

fn parse_user_input(input: &str) -> Option<NaiveDateTime> {
    if has_shape(input, DATE_TIME_INPUT_SHAPE) {
        return NaiveDateTime::parse_from_str(input, DATE_TIME_INPUT_FORMAT).ok();
    }
    if has_shape(input, DATE_SHAPE) {
        return NaiveDate::parse_from_str(input, DATE_FORMAT)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN));
    }
    None
}

/// Exact layout check: `d` is an ASCII digit, anything else is literal.
fn has_shape(input: &str, shape: &str) -> bool {
    input.len() == shape.len()
        && input
            .bytes()
            .zip(shape.bytes())
            .all(|(c, s)| if s == b'd' { c.is_ascii_digit() } else { c == s })
}

/// RFC 3339 as the backend writes it: upper-case `T` separator and `Z`.
fn is_canonical_rfc3339(timestamp: &str) -> bool {
    timestamp.as_bytes().get(10) == Some(&b'T') && !timestamp.ends_with('z')
}

fn encode_in<Z>(zone: &Z, naive: NaiveDateTime) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    let local = match zone.from_local_datetime(&naive).earliest() {
        Some(local) => local,
        // Inside a DST gap: read the wall time with the offset in force
        // just before the jump, which lands after the gap.
        None => {
            let offset = zone.offset_from_utc_datetime(&naive).fix();
            let utc = naive - chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
            zone.from_utc_datetime(&utc)
        }
    };
    local.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn render<Z>(local: &DateTime<Z>) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    if local.hour() == 0 && local.minute() == 0 {
        local.format(DATE_FORMAT).to_string()
    } else {
        local.format(DATE_TIME_DISPLAY_FORMAT).to_string()
    }
}
