//! Abort paths: runs that stop before committing must leave the local
//! records untouched, with the single exception of stale-record removal.

use poscal::server::{
    data::{event::EventRepository, tower::TowerRepository},
    service::sync::{AbortReason, RunOutcome},
};

use crate::sync::setup::{
    event_body, mock_calendar_get, mock_posmon_feed, seed_authorized_character, test_setup,
};

/// Expect a run without a stored credential to abort before any remote call
#[tokio::test]
async fn missing_credential_aborts() {
    let test = test_setup().await;
    TowerRepository::new(&test.state.db)
        .enable(1, 101)
        .await
        .unwrap();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Aborted(AbortReason::NoCredential));
}

/// Expect a credential without a configured calendar to abort the run
#[tokio::test]
async fn missing_calendar_setting_aborts() {
    let test = test_setup().await;
    let tokens = poscal::server::service::token::TokenService::new(
        &test.state.db,
        &test.state.http,
        &test.state.google,
    );
    let token = poscal::server::model::token::OauthToken {
        access_token: "tok".to_string(),
        expires: chrono::Utc::now() + chrono::Duration::hours(1),
        refresh_token: None,
    };
    tokens.set(1, &token).await.unwrap();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Aborted(AbortReason::CalendarMissing));
}

/// Expect a calendar deleted on the Google side to abort, not recreate
#[tokio::test]
async fn vanished_calendar_aborts() {
    let mut test = test_setup().await;
    seed_authorized_character(&test, 1).await;

    test.server
        .mock("GET", "/calendar/v3/calendars/cal-1")
        .with_status(404)
        .expect(1)
        .create();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Aborted(AbortReason::CalendarMissing));
}

/// Expect a credential rejected beyond renewal to abort with the auth
/// reason so user-facing flows can redirect to re-authorization
#[tokio::test]
async fn rejected_credential_aborts_auth() {
    let mut test = test_setup().await;
    // Seeded credential carries no refresh token, so the one renewal
    // attempt fails fatally.
    seed_authorized_character(&test, 1).await;

    test.server
        .mock("GET", "/calendar/v3/calendars/cal-1")
        .with_status(401)
        .expect(1)
        .create();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Aborted(AbortReason::Auth));
}

/// Expect a remote failure while building the actual set to abort the run
/// and leave the record in place
#[tokio::test]
async fn api_failure_during_state_fetch_aborts() {
    let mut test = test_setup().await;
    seed_authorized_character(&test, 1).await;
    TowerRepository::new(&test.state.db)
        .enable(1, 101)
        .await
        .unwrap();
    let events = EventRepository::new(&test.state.db);
    events.upsert(1, 101, "evt-1").await.unwrap();

    mock_calendar_get(&mut test.server);
    mock_posmon_feed(&mut test.server, 48, 2);
    test.server
        .mock("GET", "/calendar/v3/calendars/cal-1/events/evt-1")
        .with_status(500)
        .expect(1)
        .create();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Aborted(AbortReason::ApiFailure));
    // The record was not touched: the run must not apply a partial diff
    // against unreliable actual-state data.
    assert_eq!(events.get_for_char(1).await.unwrap().len(), 1);
}

/// Expect a stale record to be dropped even when the run aborts later
#[tokio::test]
async fn stale_record_removal_survives_abort() {
    let mut test = test_setup().await;
    seed_authorized_character(&test, 1).await;
    TowerRepository::new(&test.state.db)
        .enable(1, 101)
        .await
        .unwrap();
    let events = EventRepository::new(&test.state.db);
    events.upsert(1, 101, "evt-1").await.unwrap();

    mock_calendar_get(&mut test.server);
    mock_posmon_feed(&mut test.server, 48, 2);
    // The tracked event is gone remotely; the re-add then fails.
    test.server
        .mock("GET", "/calendar/v3/calendars/cal-1/events/evt-1")
        .with_status(404)
        .expect(1)
        .create();
    test.server
        .mock("POST", "/calendar/v3/calendars/cal-1/events")
        .with_status(500)
        .expect(1)
        .create();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Aborted(AbortReason::ApiFailure));
    // The stale record is gone regardless of the abort; no new record was
    // committed for the failed add.
    assert!(events.get_for_char(1).await.unwrap().is_empty());
}

/// Expect a failed add to leave no record behind for the added event
#[tokio::test]
async fn failed_add_stages_nothing() {
    let mut test = test_setup().await;
    seed_authorized_character(&test, 1).await;
    TowerRepository::new(&test.state.db)
        .enable(1, 101)
        .await
        .unwrap();

    mock_calendar_get(&mut test.server);
    mock_posmon_feed(&mut test.server, 48, 2);
    test.server
        .mock("POST", "/calendar/v3/calendars/cal-1/events")
        .with_status(503)
        .expect(1)
        .create();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Aborted(AbortReason::ApiFailure));
    assert!(EventRepository::new(&test.state.db)
        .get_for_char(1)
        .await
        .unwrap()
        .is_empty());
}
