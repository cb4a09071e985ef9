use std::sync::Arc;

use chrono::{Duration, Utc};
use mockito::{Mock, Server, ServerGuard};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Schema};

use poscal::server::{
    client::posmon::PosmonClient,
    config::GoogleConfig,
    data::setting::SettingRepository,
    model::{app::AppState, token::OauthToken},
    scheduler::SyncScheduler,
    service::token::TokenService,
};

pub struct TestSetup {
    pub server: ServerGuard,
    pub state: AppState,
}

// Returns an [`AppState`] wired against a mock HTTP server, used across the
// synchronization integration tests.
pub async fn test_setup() -> TestSetup {
    let mock_server = Server::new_async().await;
    let mock_server_url = mock_server.url();

    let http = reqwest::Client::new();
    let google = GoogleConfig {
        client_id: "google_client_id".to_string(),
        client_secret: "google_client_secret".to_string(),
        api_url: format!("{}/calendar/v3", mock_server_url),
        token_url: format!("{}/oauth2/token", mock_server_url),
    };
    let posmon = PosmonClient::new(http.clone(), format!("{}/posmon", mock_server_url));

    let db = Database::connect("sqlite::memory:").await.unwrap();
    create_tables(&db).await.unwrap();

    let sync = Arc::new(SyncScheduler::new(
        db.clone(),
        http.clone(),
        google.clone(),
        posmon.clone(),
    ));

    let state = AppState {
        db,
        http,
        google,
        posmon,
        sync,
    };

    TestSetup {
        server: mock_server,
        state,
    }
}

async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(DbBackend::Sqlite);

    let stmts = vec![
        schema.create_table_from_entity(entity::prelude::Setting),
        schema.create_table_from_entity(entity::prelude::Token),
        schema.create_table_from_entity(entity::prelude::EnabledTower),
        schema.create_table_from_entity(entity::prelude::CalendarEvent),
    ];

    for stmt in stmts {
        db.execute(&stmt).await?;
    }

    Ok(())
}

/// Stores a non-expired credential and the calendar setting for a character
pub async fn seed_authorized_character(test: &TestSetup, char_id: i64) {
    let tokens = TokenService::new(&test.state.db, &test.state.http, &test.state.google);
    let token = OauthToken {
        access_token: "tok".to_string(),
        expires: Utc::now() + Duration::hours(1),
        refresh_token: None,
    };
    tokens.set(char_id, &token).await.unwrap();

    SettingRepository::new(&test.state.db)
        .set(char_id, SettingRepository::CALENDAR, "cal-1")
        .await
        .unwrap();
}

/// Mocks the calendar existence check performed at the start of every run
pub fn mock_calendar_get(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/calendar/v3/calendars/cal-1")
        .with_status(200)
        .with_body("{\"id\": \"cal-1\", \"summary\": \"EVE POS events\"}")
        .create()
}

/// Mocks the posmon feed with a single tower (orbit 101) at the given fuel
/// state, observed at 2020-01-01T00:00:00Z
pub fn mock_posmon_feed(server: &mut ServerGuard, fuel: i64, fuel_per_hour: i64) -> Mock {
    let body = format!(
        concat!(
            "{{\"corporation\": \"Test Corp\", \"cache_ts\": \"2020-01-01 00:00:00\", ",
            "\"towers\": [{{\"name\": \"Test Tower\", \"location\": ",
            "{{\"orbit_id\": 101, \"orbit_name\": \"Orbit IV - Moon 2\"}}, ",
            "\"fuel\": {}, \"fuel_per_hour\": {}}}]}}\n",
        ),
        fuel, fuel_per_hour
    );

    server
        .mock("GET", "/posmon")
        .with_status(200)
        .with_body(body)
        .create()
}

/// Serialized calendar event resource at the given start time
pub fn event_body(event_id: &str, start: &str, status: &str, sequence: i64) -> String {
    format!(
        concat!(
            "{{\"id\": \"{}\", \"status\": \"{}\", \"sequence\": {}, ",
            "\"start\": {{\"dateTime\": \"{}\", \"timeZone\": \"UTC\"}}, ",
            "\"end\": {{\"dateTime\": \"{}\", \"timeZone\": \"UTC\"}}, ",
            "\"summary\": \"Refuel Test Tower\", \"location\": \"Orbit IV - Moon 2\"}}"
        ),
        event_id, status, sequence, start, start
    )
}
