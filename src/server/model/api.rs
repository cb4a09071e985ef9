use serde::{Deserialize, Serialize};

/// Generic error payload returned by API endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorDto {
    pub error: String,
}

/// Query parameter identifying the acting character.
///
/// Session handling lives outside this service, so endpoints take the
/// character id explicitly.
#[derive(Debug, Deserialize)]
pub struct CharacterQuery {
    pub char_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CalendarDto {
    pub calendar_id: String,
}

#[derive(Debug, Serialize)]
pub struct PurgeDto {
    pub deleted: usize,
}
