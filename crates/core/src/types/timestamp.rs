//! Order timestamps in Casablanca civil time.

use core::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Timezone all order timestamps are expressed in.
pub const ORDER_TIMEZONE: Tz = chrono_tz::Africa::Casablanca;

/// Canonical stored format.
const STORED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filename-safe format (no colons).
const FILENAME_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Error parsing an [`OrderTimestamp`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid order timestamp {0:?}, expected YYYY-MM-DD HH:MM:SS")]
pub struct TimestampError(pub String);

/// Local civil time of an order in `Africa/Casablanca`, second precision.
///
/// Stored as `YYYY-MM-DD HH:MM:SS`. The zone is implied, not stored, which
/// matches the history files written by earlier versions of the form.
///
/// ```
/// use commande_core::OrderTimestamp;
///
/// let ts = OrderTimestamp::parse("2024-01-01 10:00:00").unwrap();
/// assert_eq!(ts.to_string(), "2024-01-01 10:00:00");
/// assert_eq!(ts.filename_safe(), "2024-01-01 10-00-00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderTimestamp(NaiveDateTime);

impl OrderTimestamp {
    /// Current time in Casablanca, truncated to the second.
    #[must_use]
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Convert a UTC instant to Casablanca civil time.
    #[must_use]
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        let local = ORDER_TIMEZONE.from_utc_datetime(&instant.naive_utc());
        let naive = local.naive_local();
        Self(naive.with_nanosecond(0).unwrap_or(naive))
    }

    /// Parse the stored `YYYY-MM-DD HH:MM:SS` form.
    ///
    /// # Errors
    ///
    /// Returns `TimestampError` if the input does not match the format.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        NaiveDateTime::parse_from_str(s, STORED_FORMAT)
            .map(Self)
            .map_err(|_| TimestampError(s.to_owned()))
    }

    /// Filename-safe rendering, `YYYY-MM-DD HH-MM-SS`.
    #[must_use]
    pub fn filename_safe(&self) -> String {
        self.0.format(FILENAME_FORMAT).to_string()
    }

    /// The underlying civil date-time.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for OrderTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(STORED_FORMAT))
    }
}

impl std::str::FromStr for OrderTimestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OrderTimestamp {
    type Error = TimestampError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrderTimestamp> for String {
    fn from(ts: OrderTimestamp) -> Self {
        ts.to_string()
    }
}
