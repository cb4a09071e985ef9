//! HTTP routing configuration.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::server::{controller, model::app::AppState};

/// Builds the application's HTTP router.
///
/// # Registered Endpoints
/// - `POST   /api/admin/run` - Force a full synchronization run now
/// - `GET    /api/towers/status` - Plain-text tower fuel status listing
/// - `PUT    /api/towers/{orbit_id}` - Enable monitoring of a tower
/// - `DELETE /api/towers/{orbit_id}` - Disable monitoring of a tower
/// - `POST   /api/calendar` - Ensure/create the character's calendar
/// - `DELETE /api/calendar/events` - Purge every tracked event
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/run", post(controller::admin::force_run))
        .route("/api/towers/status", get(controller::admin::tower_status))
        .route(
            "/api/towers/{orbit_id}",
            put(controller::tower::enable_tower).delete(controller::tower::disable_tower),
        )
        .route("/api/calendar", post(controller::calendar::create_calendar))
        .route(
            "/api/calendar/events",
            delete(controller::calendar::purge_events),
        )
}
