//! The documented four-phase lifecycle of a single tower's reminder event:
//! first appearance, steady state, fuel-rate drift, and removal.
//!
//! Tower 101 reports 48 units of fuel at 2 units/hour, observed at
//! 2020-01-01T00:00:00Z: fuel runs out at 2020-01-03T00:00:00Z, and with the
//! 2-day-1-hour lead the reminder lands at 2019-12-31T23:00:00Z.

use chrono::{TimeZone, Utc};
use mockito::Matcher;

use poscal::server::{
    data::{event::EventRepository, tower::TowerRepository},
    model::google::EventDateTime,
    service::sync::{RunOutcome, SyncRun},
};

use crate::sync::setup::{
    event_body, mock_calendar_get, mock_posmon_feed, seed_authorized_character, test_setup,
};

static TARGET_START: &str = "2019-12-31T23:00:00Z";

fn target_start_value() -> serde_json::Value {
    let start = Utc.with_ymd_and_hms(2019, 12, 31, 23, 0, 0).unwrap();
    serde_json::to_value(EventDateTime::utc(start)).unwrap()
}

/// Expect the first run to create one event at the computed start and to
/// record the returned event id
#[tokio::test]
async fn first_run_adds_event() {
    let mut test = test_setup().await;
    seed_authorized_character(&test, 1).await;
    TowerRepository::new(&test.state.db)
        .enable(1, 101)
        .await
        .unwrap();

    let calendar = mock_calendar_get(&mut test.server);
    let feed = mock_posmon_feed(&mut test.server, 48, 2);
    let insert = test
        .server
        .mock("POST", "/calendar/v3/calendars/cal-1/events")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "kind": "calendar#event",
            "summary": "Refuel Test Tower",
            "location": "Orbit IV - Moon 2",
            "start": target_start_value(),
            "end": target_start_value(),
        })))
        .with_status(200)
        .with_body(event_body("evt-1", TARGET_START, "confirmed", 0))
        .expect(1)
        .create();

    let outcome = SyncRun::new(
        &test.state.db,
        &test.state.http,
        &test.state.google,
        &test.state.posmon,
        1,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(outcome, RunOutcome::Committed);

    let records = EventRepository::new(&test.state.db)
        .get_for_char(1)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].orbit_id, 101);
    assert_eq!(records[0].event_id, "evt-1");

    calendar.assert();
    feed.assert();
    insert.assert();
}

/// Expect a second run with an unchanged feed to make no calls beyond the
/// validation fetches
#[tokio::test]
async fn second_run_makes_no_changes() {
    let mut test = test_setup().await;
    seed_authorized_character(&test, 1).await;
    TowerRepository::new(&test.state.db)
        .enable(1, 101)
        .await
        .unwrap();
    EventRepository::new(&test.state.db)
        .upsert(1, 101, "evt-1")
        .await
        .unwrap();

    let calendar = mock_calendar_get(&mut test.server);
    let feed = mock_posmon_feed(&mut test.server, 48, 2);
    let event_get = test
        .server
        .mock("GET", "/calendar/v3/calendars/cal-1/events/evt-1")
        .with_status(200)
        .with_body(event_body("evt-1", TARGET_START, "confirmed", 0))
        .expect(1)
        .create();
    let insert = test
        .server
        .mock("POST", "/calendar/v3/calendars/cal-1/events")
        .expect(0)
        .create();
    let update = test
        .server
        .mock("PUT", "/calendar/v3/calendars/cal-1/events/evt-1")
        .expect(0)
        .create();
    let delete = test
        .server
        .mock("DELETE", "/calendar/v3/calendars/cal-1/events/evt-1")
        .expect(0)
        .create();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Committed);

    calendar.assert();
    feed.assert();
    event_get.assert();
    insert.assert();
    update.assert();
    delete.assert();
}

/// Expect an event drifted three hours from its target to be rewritten with
/// the sequence number advanced by exactly one
#[tokio::test]
async fn drifted_event_is_updated() {
    let mut test = test_setup().await;
    seed_authorized_character(&test, 1).await;
    TowerRepository::new(&test.state.db)
        .enable(1, 101)
        .await
        .unwrap();
    EventRepository::new(&test.state.db)
        .upsert(1, 101, "evt-1")
        .await
        .unwrap();

    mock_calendar_get(&mut test.server);
    mock_posmon_feed(&mut test.server, 48, 2);
    test.server
        .mock("GET", "/calendar/v3/calendars/cal-1/events/evt-1")
        .with_status(200)
        .with_body(event_body("evt-1", "2019-12-31T20:00:00Z", "confirmed", 4))
        .expect(1)
        .create();
    let update = test
        .server
        .mock("PUT", "/calendar/v3/calendars/cal-1/events/evt-1")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "sequence": 5,
            "start": target_start_value(),
        })))
        .with_status(200)
        .with_body(event_body("evt-1", TARGET_START, "confirmed", 5))
        .expect(1)
        .create();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Committed);
    update.assert();
}

/// Expect a run after the tower's membership is removed to delete the event
/// and drop the local record
#[tokio::test]
async fn removed_membership_deletes_event() {
    let mut test = test_setup().await;
    seed_authorized_character(&test, 1).await;
    // Tower 101 still reports in the feed but is no longer enabled.
    EventRepository::new(&test.state.db)
        .upsert(1, 101, "evt-1")
        .await
        .unwrap();

    mock_calendar_get(&mut test.server);
    mock_posmon_feed(&mut test.server, 48, 2);
    test.server
        .mock("GET", "/calendar/v3/calendars/cal-1/events/evt-1")
        .with_status(200)
        .with_body(event_body("evt-1", TARGET_START, "confirmed", 0))
        .expect(1)
        .create();
    let delete = test
        .server
        .mock("DELETE", "/calendar/v3/calendars/cal-1/events/evt-1")
        .with_status(204)
        .expect(1)
        .create();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Committed);

    let records = EventRepository::new(&test.state.db)
        .get_for_char(1)
        .await
        .unwrap();
    assert!(records.is_empty());

    delete.assert();
}

/// Expect a delete answered with 404 to still succeed and drop the record
#[tokio::test]
async fn delete_of_missing_event_is_idempotent() {
    let mut test = test_setup().await;
    seed_authorized_character(&test, 1).await;
    EventRepository::new(&test.state.db)
        .upsert(1, 101, "evt-1")
        .await
        .unwrap();

    mock_calendar_get(&mut test.server);
    // Feed no longer reports the tower at all.
    test.server
        .mock("GET", "/posmon")
        .with_status(200)
        .with_body("")
        .create();
    test.server
        .mock("GET", "/calendar/v3/calendars/cal-1/events/evt-1")
        .with_status(200)
        .with_body(event_body("evt-1", TARGET_START, "confirmed", 0))
        .create();
    test.server
        .mock("DELETE", "/calendar/v3/calendars/cal-1/events/evt-1")
        .with_status(404)
        .expect(1)
        .create();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Committed);
    assert!(EventRepository::new(&test.state.db)
        .get_for_char(1)
        .await
        .unwrap()
        .is_empty());
}

/// Expect a cancelled remote event to be replaced by a fresh one
#[tokio::test]
async fn cancelled_event_is_recreated() {
    let mut test = test_setup().await;
    seed_authorized_character(&test, 1).await;
    TowerRepository::new(&test.state.db)
        .enable(1, 101)
        .await
        .unwrap();
    EventRepository::new(&test.state.db)
        .upsert(1, 101, "evt-1")
        .await
        .unwrap();

    mock_calendar_get(&mut test.server);
    mock_posmon_feed(&mut test.server, 48, 2);
    test.server
        .mock("GET", "/calendar/v3/calendars/cal-1/events/evt-1")
        .with_status(200)
        .with_body(event_body("evt-1", TARGET_START, "cancelled", 0))
        .expect(1)
        .create();
    let insert = test
        .server
        .mock("POST", "/calendar/v3/calendars/cal-1/events")
        .with_status(200)
        .with_body(event_body("evt-2", TARGET_START, "confirmed", 0))
        .expect(1)
        .create();

    let outcome = test.state.sync.run_for_char(1).await.unwrap();

    assert_eq!(outcome, RunOutcome::Committed);

    let records = EventRepository::new(&test.state.db)
        .get_for_char(1)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].event_id, "evt-2");

    insert.assert();
}
