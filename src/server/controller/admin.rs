use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::server::{error::Error, model::app::AppState};

/// Triggers a full synchronization run for every character.
///
/// Fire-and-forget: the run proceeds in the background and the request
/// returns immediately. Per-character locking makes a forced run that
/// overlaps the periodic one wait rather than double-apply.
pub async fn force_run(State(state): State<AppState>) -> impl IntoResponse {
    let scheduler = Arc::clone(&state.sync);

    tokio::spawn(async move {
        if let Err(e) = scheduler.run_for_all().await {
            tracing::error!("Forced update run failed: {:?}", e);
        }
    });

    StatusCode::ACCEPTED
}

/// Plain-text listing of every tower in the feed with its computed fuel
/// expiration.
pub async fn tower_status(State(state): State<AppState>) -> Result<String, Error> {
    let towers = state.posmon.fetch_all().await?;

    let mut lines: Vec<String> = towers
        .values()
        .map(|tower| {
            format!(
                "{:>32} {:>24}: {}",
                tower.name,
                tower.orbit_name,
                tower.fuel_expiration()
            )
        })
        .collect();
    lines.sort();

    Ok(lines.join("\n"))
}
