//! Wire shapes for the Google Calendar v3 REST API.
//!
//! Only the fields the service reads or writes are modeled; everything else
//! the API returns is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CALENDAR_KIND: &str = "calendar#calendar";
pub const EVENT_KIND: &str = "calendar#event";

/// Event status Google reports for events deleted through the UI.
pub const STATUS_CANCELLED: &str = "cancelled";

#[derive(Clone, Debug, Deserialize)]
pub struct CalendarResource {
    pub id: String,
    #[serde(default)]
    pub summary: String,
}

/// Timestamp of an event boundary, always expressed in UTC by this service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: DateTime<Utc>,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

impl EventDateTime {
    pub fn utc(instant: DateTime<Utc>) -> Self {
        Self {
            date_time: instant,
            time_zone: "UTC".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventResource {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub sequence: i64,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl EventResource {
    pub fn is_cancelled(&self) -> bool {
        self.status == STATUS_CANCELLED
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CalendarPayload {
    pub kind: &'static str,
    pub summary: String,
}

/// Body of an event insert or update request. `sequence` is only present on
/// updates, where Google requires it to advance past the stored value.
#[derive(Clone, Debug, Serialize)]
pub struct EventPayload {
    pub kind: &'static str,
    pub summary: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
}
