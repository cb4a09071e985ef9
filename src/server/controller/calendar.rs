use axum::{
    extract::{Query, State},
    Json,
};

use crate::server::{
    error::Error,
    model::{
        api::{CalendarDto, CharacterQuery, PurgeDto},
        app::AppState,
    },
    service::calendar::CalendarService,
};

/// Ensures the character has a calendar, creating one remotely if needed.
pub async fn create_calendar(
    State(state): State<AppState>,
    Query(query): Query<CharacterQuery>,
) -> Result<Json<CalendarDto>, Error> {
    let service = CalendarService::new(&state.db, &state.http, &state.google);

    let calendar_id = service.ensure_calendar(query.char_id).await?;

    Ok(Json(CalendarDto { calendar_id }))
}

/// Deletes every tracked remote event for the character and clears the
/// local records.
pub async fn purge_events(
    State(state): State<AppState>,
    Query(query): Query<CharacterQuery>,
) -> Result<Json<PurgeDto>, Error> {
    let service = CalendarService::new(&state.db, &state.http, &state.google);

    let deleted = service.purge_events(query.char_id).await?;

    Ok(Json(PurgeDto { deleted }))
}
