//! Timestamps as the radiko API encodes them
//!
//! Program boundaries travel as fixed-width digit strings in Japan Standard
//! Time: `YYYYMMDDHHmmss` for instants and `YYYYMMDD` for listing dates.
//! [`Timestamp`] is the numeric view of such a string; it is what interval
//! comparisons operate on.

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDateTime, TimeZone, Timelike};
use std::fmt;
use std::str::FromStr;

/// Offset of Japan Standard Time from UTC (no daylight saving)
pub const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Hour (JST) at which a broadcast day begins
pub const BROADCAST_DAY_START_HOUR: u32 = 5;

const DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";
const DATE_FORMAT: &str = "%Y%m%d";

/// The service's local time zone
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("+09:00 is a valid UTC offset")
}

/// Format an instant as the service's 14-digit timestamp string
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use pmoradiko::timestamp::format_datetime;
///
/// let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
/// assert_eq!(format_datetime(&at), "20240101093000");
/// ```
pub fn format_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&jst()).format(DATETIME_FORMAT).to_string()
}

/// Listing date (`YYYYMMDD`) of the broadcast day containing `at`
///
/// A broadcast day runs from 05:00 JST to 05:00 JST the next calendar day,
/// so the small hours belong to the previous day's listing.
pub fn broadcast_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let local = at.with_timezone(&jst());
    let day = if local.hour() < BROADCAST_DAY_START_HOUR {
        local - Duration::days(1)
    } else {
        local
    };
    day.format(DATE_FORMAT).to_string()
}

/// Numeric value of a radiko timestamp string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Parse a digit string
    ///
    /// Any width is accepted; values are compared numerically.
    pub fn parse(value: &str) -> Result<Self> {
        value
            .parse::<u64>()
            .map(Self)
            .map_err(|source| Error::MalformedTimestamp {
                value: value.to_string(),
                source,
            })
    }

    /// Timestamp of an instant, in JST
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        let local = at.with_timezone(&jst());
        let date = u64::from(local.year().max(0) as u32) * 10_000
            + u64::from(local.month()) * 100
            + u64::from(local.day());
        let time = u64::from(local.hour()) * 10_000
            + u64::from(local.minute()) * 100
            + u64::from(local.second());
        Self(date * 1_000_000 + time)
    }

    /// Raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Interpret the value as a JST date-time
    ///
    /// Returns `None` when the digits do not spell a valid calendar instant.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let naive = NaiveDateTime::parse_from_str(&self.to_string(), DATETIME_FORMAT).ok()?;
        jst().from_local_datetime(&naive).single()
    }

    /// Whether this timestamp lies in the half-open interval `[start, end)`
    pub fn within(&self, start: Timestamp, end: Timestamp) -> bool {
        start <= *self && *self < end
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:014}", self.0)
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for Timestamp {
    fn from(at: &DateTime<Tz>) -> Self {
        Self::from_datetime(at)
    }
}
