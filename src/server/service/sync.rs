//! The per-character calendar synchronization run.
//!
//! A run computes the set of reminder events that should exist for a
//! character (from the posmon feed and the character's enabled towers),
//! compares it against the events that actually exist remotely, and applies
//! the minimal add/update/delete operations to converge the two. Local event
//! records are staged in memory and committed in a single transaction only
//! when the whole run succeeds. Remote side effects that already happened
//! before an abort are not rolled back; the next periodic run recomputes a
//! fresh diff and converges again.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    client::{google::CalendarClient, posmon::PosmonClient},
    config::GoogleConfig,
    data::{event::EventRepository, setting::SettingRepository, tower::TowerRepository},
    error::{calendar::CalendarError, posmon::PosmonError, Error},
    model::{
        google::{EventDateTime, EventPayload, EventResource, EVENT_KIND},
        posmon::Tower,
    },
    service::token::TokenService,
    util::time::round_down_to_hour,
};

/// Lead time between the reminder event and the actual fuel expiration
/// (2 days + 1 hour).
pub const REFUEL_OFFSET: Duration = Duration::hours(49);

/// Start-time drift tolerated before an existing event is rewritten. Keeps
/// minor fuel-rate jitter from producing an update every run.
pub const UPDATE_TOLERANCE: Duration = Duration::hours(1);

/// Reason a synchronization run stopped before committing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// No stored Google credential; the character must authorize first.
    NoCredential,
    /// The remote API rejected the credential beyond renewal.
    Auth,
    /// No calendar is configured, or the configured one no longer exists.
    CalendarMissing,
    /// The remote API failed in a way the next periodic run may recover
    /// from.
    ApiFailure,
}

/// Terminal state of a synchronization run. A run that returns an `Err`
/// instead reached the failure state.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Committed,
    Aborted(AbortReason),
}

/// Desired shape of one reminder event, derived from a tower's fuel state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventWindow {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub location: String,
}

impl EventWindow {
    pub fn to_payload(&self, sequence: Option<i64>) -> EventPayload {
        EventPayload {
            kind: EVENT_KIND,
            summary: self.summary.clone(),
            start: EventDateTime::utc(self.start),
            // Zero-duration marker event.
            end: EventDateTime::utc(self.start),
            location: self.location.clone(),
            sequence,
        }
    }
}

/// Derives the desired event window for a tower.
pub fn event_window(tower: &Tower) -> Result<EventWindow, Error> {
    let start = round_down_to_hour(tower.fuel_expiration() - REFUEL_OFFSET)?;

    Ok(EventWindow {
        summary: format!("Refuel {}", tower.name),
        start,
        location: tower.orbit_name.clone(),
    })
}

/// Whether an existing remote event has drifted far enough from its target
/// window to warrant an update.
pub fn start_drifted(existing: &EventResource, window: &EventWindow) -> bool {
    (existing.start.date_time - window.start).abs() > UPDATE_TOLERANCE
}

/// The add/update/delete split between desired and actual resource ids.
///
/// The three sets are pairwise disjoint and their union is the union of the
/// inputs, so any permutation within a set is safe to apply.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EventDiff {
    pub to_add: Vec<i64>,
    pub to_update: Vec<i64>,
    pub to_delete: Vec<i64>,
}

impl EventDiff {
    pub fn compute(desired: &HashSet<i64>, actual: &HashSet<i64>) -> Self {
        Self {
            to_add: desired.difference(actual).copied().collect(),
            to_update: desired.intersection(actual).copied().collect(),
            to_delete: actual.difference(desired).copied().collect(),
        }
    }
}

/// Staged local record mutation, applied only when the run commits.
enum RecordChange {
    Put { orbit_id: i64, event_id: String },
    Remove { orbit_id: i64 },
}

/// Internal error carrying either an abort reason or a hard failure.
enum RunError {
    Aborted(AbortReason),
    Failed(Error),
}

impl From<sea_orm::DbErr> for RunError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Failed(err.into())
    }
}

impl From<PosmonError> for RunError {
    fn from(err: PosmonError) -> Self {
        Self::Failed(err.into())
    }
}

impl From<Error> for RunError {
    fn from(err: Error) -> Self {
        Self::Failed(err)
    }
}

/// Maps a calendar API error to the abort reason the run ends with.
/// `NotFound` is context dependent and handled at each call site before
/// this.
fn abort_for(err: CalendarError) -> RunError {
    match err {
        CalendarError::Unauthorized | CalendarError::Token(_) => {
            RunError::Aborted(AbortReason::Auth)
        }
        _ => RunError::Aborted(AbortReason::ApiFailure),
    }
}

/// One synchronization run for one character.
pub struct SyncRun<'a> {
    db: &'a DatabaseConnection,
    http: &'a reqwest::Client,
    google: &'a GoogleConfig,
    posmon: &'a PosmonClient,
    char_id: i64,
}

impl<'a> SyncRun<'a> {
    /// Creates a new instance of [`SyncRun`]
    pub fn new(
        db: &'a DatabaseConnection,
        http: &'a reqwest::Client,
        google: &'a GoogleConfig,
        posmon: &'a PosmonClient,
        char_id: i64,
    ) -> Self {
        Self {
            db,
            http,
            google,
            posmon,
            char_id,
        }
    }

    /// Executes the run to one of its terminal states.
    ///
    /// Staged record changes are committed only on full success; stale
    /// record removals performed during state fetch persist regardless of
    /// the outcome.
    pub async fn run(&self) -> Result<RunOutcome, Error> {
        match self.execute().await {
            Ok(changes) => {
                self.commit(changes).await?;
                tracing::info!("Run for char_id={} successful", self.char_id);
                Ok(RunOutcome::Committed)
            }
            Err(RunError::Aborted(reason)) => {
                tracing::warn!("Run for char_id={} aborted with {:?}", self.char_id, reason);
                Ok(RunOutcome::Aborted(reason))
            }
            Err(RunError::Failed(err)) => {
                tracing::error!("Run for char_id={} failed: {:?}", self.char_id, err);
                Err(err)
            }
        }
    }

    async fn execute(&self) -> Result<Vec<RecordChange>, RunError> {
        let tokens = TokenService::new(self.db, self.http, self.google);

        let credential = match tokens.get(self.char_id).await.map_err(Error::from)? {
            Some(credential) => credential,
            None => return Err(RunError::Aborted(AbortReason::NoCredential)),
        };
        let client = CalendarClient::new(self.http, &tokens, self.google, self.char_id, credential);

        let cal_id = self.get_calendar(&client).await?;
        let towers = self.enabled_towers().await?;
        let windows = self.make_event_windows(&towers)?;
        let existing = self.get_events(&client, &cal_id).await?;

        let desired_ids: HashSet<i64> = windows.keys().copied().collect();
        let actual_ids: HashSet<i64> = existing.keys().copied().collect();
        let diff = EventDiff::compute(&desired_ids, &actual_ids);
        tracing::debug!(
            "Diff for char_id={}: {} add, {} update, {} delete",
            self.char_id,
            diff.to_add.len(),
            diff.to_update.len(),
            diff.to_delete.len()
        );

        let mut changes = Vec::new();
        for orbit_id in &diff.to_add {
            changes.push(
                self.do_add(&client, &cal_id, *orbit_id, &windows[orbit_id])
                    .await?,
            );
        }
        for orbit_id in &diff.to_update {
            self.do_update(
                &client,
                &cal_id,
                *orbit_id,
                &existing[orbit_id],
                &windows[orbit_id],
            )
            .await?;
        }
        for orbit_id in &diff.to_delete {
            changes.push(
                self.do_delete(&client, &cal_id, *orbit_id, &existing[orbit_id])
                    .await?,
            );
        }

        Ok(changes)
    }

    /// Resolves the character's calendar id and verifies it still exists
    /// remotely.
    async fn get_calendar(&self, client: &CalendarClient<'_>) -> Result<String, RunError> {
        let settings = SettingRepository::new(self.db);

        let cal_id = match settings.get(self.char_id, SettingRepository::CALENDAR).await? {
            Some(cal_id) => cal_id,
            None => return Err(RunError::Aborted(AbortReason::CalendarMissing)),
        };

        match client.get_calendar(&cal_id).await {
            Ok(_) => Ok(cal_id),
            Err(CalendarError::NotFound) => Err(RunError::Aborted(AbortReason::CalendarMissing)),
            Err(err) => Err(abort_for(err)),
        }
    }

    /// Fetches the feed snapshot restricted to the character's enabled
    /// towers.
    async fn enabled_towers(&self) -> Result<HashMap<i64, Tower>, RunError> {
        let memberships = TowerRepository::new(self.db);

        let enabled: HashSet<i64> = memberships
            .get_for_char(self.char_id)
            .await?
            .into_iter()
            .map(|row| row.orbit_id)
            .collect();

        let mut towers = self.posmon.fetch_all().await?;
        towers.retain(|orbit_id, _| enabled.contains(orbit_id));

        Ok(towers)
    }

    fn make_event_windows(
        &self,
        towers: &HashMap<i64, Tower>,
    ) -> Result<HashMap<i64, EventWindow>, RunError> {
        let mut windows = HashMap::new();
        for (&orbit_id, tower) in towers {
            windows.insert(orbit_id, event_window(tower)?);
        }

        Ok(windows)
    }

    /// Fetches the remote event behind every local record, building the
    /// actual set.
    ///
    /// Records whose remote event is gone or cancelled are dropped on the
    /// spot. Those removals persist even when the run aborts later, since
    /// the record invariant (a record exists only while its remote event
    /// does) is already violated.
    async fn get_events(
        &self,
        client: &CalendarClient<'_>,
        cal_id: &str,
    ) -> Result<HashMap<i64, EventResource>, RunError> {
        let events = EventRepository::new(self.db);

        let mut existing = HashMap::new();
        for record in events.get_for_char(self.char_id).await? {
            match client.get_event(cal_id, &record.event_id).await {
                Ok(event) if !event.is_cancelled() => {
                    existing.insert(record.orbit_id, event);
                }
                Ok(_) | Err(CalendarError::NotFound) => {
                    tracing::debug!(
                        "Dropping stale event record for char_id={} orbit_id={}",
                        self.char_id,
                        record.orbit_id
                    );
                    events.delete(self.char_id, record.orbit_id).await?;
                }
                Err(err) => return Err(abort_for(err)),
            }
        }

        Ok(existing)
    }

    async fn do_add(
        &self,
        client: &CalendarClient<'_>,
        cal_id: &str,
        orbit_id: i64,
        window: &EventWindow,
    ) -> Result<RecordChange, RunError> {
        tracing::info!(
            "Creating event for char_id={} orbit_id={} start={}",
            self.char_id,
            orbit_id,
            window.start
        );

        let payload = window.to_payload(None);
        let created = client.add_event(cal_id, &payload).await.map_err(abort_for)?;

        Ok(RecordChange::Put {
            orbit_id,
            event_id: created.id,
        })
    }

    async fn do_update(
        &self,
        client: &CalendarClient<'_>,
        cal_id: &str,
        orbit_id: i64,
        existing: &EventResource,
        window: &EventWindow,
    ) -> Result<(), RunError> {
        if !start_drifted(existing, window) {
            return Ok(());
        }

        tracing::info!(
            "Updating event for char_id={} orbit_id={} start={}",
            self.char_id,
            orbit_id,
            window.start
        );

        let payload = window.to_payload(Some(existing.sequence + 1));
        client
            .update_event(cal_id, &existing.id, &payload)
            .await
            .map_err(abort_for)?;

        Ok(())
    }

    async fn do_delete(
        &self,
        client: &CalendarClient<'_>,
        cal_id: &str,
        orbit_id: i64,
        existing: &EventResource,
    ) -> Result<RecordChange, RunError> {
        tracing::info!(
            "Deleting event for char_id={} orbit_id={}",
            self.char_id,
            orbit_id
        );

        match client.delete_event(cal_id, &existing.id).await {
            // Already gone remotely; the desired end state is reached.
            Ok(()) | Err(CalendarError::NotFound) => Ok(RecordChange::Remove { orbit_id }),
            Err(err) => Err(abort_for(err)),
        }
    }

    /// Applies the staged record changes atomically with respect to this
    /// character's records.
    async fn commit(&self, changes: Vec<RecordChange>) -> Result<(), Error> {
        if changes.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin().await?;
        {
            let events = EventRepository::new(&txn);
            for change in &changes {
                match change {
                    RecordChange::Put { orbit_id, event_id } => {
                        events.upsert(self.char_id, *orbit_id, event_id).await?;
                    }
                    RecordChange::Remove { orbit_id } => {
                        events.delete(self.char_id, *orbit_id).await?;
                    }
                }
            }
        }
        txn.commit().await?;

        Ok(())
    }
}
