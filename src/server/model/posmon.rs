//! Shapes of the posmon monitoring feed.
//!
//! The feed is a line-delimited JSON document: one object per corporation,
//! each carrying the snapshot timestamp and the towers observed at it.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::server::error::posmon::PosmonError;

/// Timestamp format used by the feed's `cache_ts` field.
pub static CACHE_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
pub struct PosmonRecord {
    pub corporation: String,
    pub cache_ts: String,
    pub towers: Vec<TowerRecord>,
}

impl PosmonRecord {
    /// Parses the record's snapshot timestamp, which the feed reports as a
    /// naive UTC value.
    pub fn cache_ts_utc(&self) -> Result<DateTime<Utc>, PosmonError> {
        NaiveDateTime::parse_from_str(&self.cache_ts, CACHE_TS_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|_| PosmonError::Timestamp(self.cache_ts.clone()))
    }
}

#[derive(Debug, Deserialize)]
pub struct TowerRecord {
    pub name: String,
    pub location: TowerLocation,
    pub fuel: i64,
    pub fuel_per_hour: i64,
}

#[derive(Debug, Deserialize)]
pub struct TowerLocation {
    pub orbit_id: i64,
    pub orbit_name: String,
}

/// A monitored tower with the fuel state observed at `cache_ts`.
///
/// Reconstructed in full on every feed fetch; never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tower {
    pub orbit_id: i64,
    pub name: String,
    pub orbit_name: String,
    pub corporation: String,
    pub fuel: i64,
    pub fuel_per_hour: i64,
    pub cache_ts: DateTime<Utc>,
}

impl Tower {
    pub fn new(record: TowerRecord, cache_ts: DateTime<Utc>, corporation: String) -> Self {
        Self {
            orbit_id: record.location.orbit_id,
            name: record.name,
            orbit_name: record.location.orbit_name,
            corporation,
            fuel: record.fuel,
            fuel_per_hour: record.fuel_per_hour,
            cache_ts,
        }
    }

    /// Instant at which the tower runs out of fuel, to whole-hour precision.
    ///
    /// A tower reporting no consumption is treated as already due rather
    /// than burning forever.
    pub fn fuel_expiration(&self) -> DateTime<Utc> {
        let hours_left = if self.fuel_per_hour > 0 {
            self.fuel / self.fuel_per_hour
        } else {
            0
        };
        self.cache_ts + Duration::hours(hours_left)
    }
}
