use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::server::{
    data::tower::TowerRepository,
    error::Error,
    model::{api::CharacterQuery, app::AppState},
};

/// Enables monitoring of a tower for a character.
pub async fn enable_tower(
    State(state): State<AppState>,
    Path(orbit_id): Path<i64>,
    Query(query): Query<CharacterQuery>,
) -> Result<StatusCode, Error> {
    TowerRepository::new(&state.db)
        .enable(query.char_id, orbit_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Disables monitoring of a tower for a character. The tower's reminder
/// event is removed by the next synchronization run.
pub async fn disable_tower(
    State(state): State<AppState>,
    Path(orbit_id): Path<i64>,
    Query(query): Query<CharacterQuery>,
) -> Result<StatusCode, Error> {
    TowerRepository::new(&state.db)
        .disable(query.char_id, orbit_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
