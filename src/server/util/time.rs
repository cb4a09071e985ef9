//! Time and date calculation utilities.

use chrono::{DateTime, Duration, DurationRound, Utc};

use crate::server::error::Error;

/// Rounds a timestamp down to the start of its hour.
///
/// Reminder events are pinned to whole hours so that small fluctuations in
/// reported fuel consumption do not move them around.
///
/// # Example
/// ```ignore
/// // 2019-12-31T23:47:12Z rounds down to 2019-12-31T23:00:00Z
/// let start = round_down_to_hour(expiration - offset)?;
/// ```
pub fn round_down_to_hour(instant: DateTime<Utc>) -> Result<DateTime<Utc>, Error> {
    instant
        .duration_trunc(Duration::hours(1))
        .map_err(|err| Error::ParseError(format!("Failed to truncate {instant} to the hour: {err}")))
}
