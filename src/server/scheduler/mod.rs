//! Scheduler and per-character lock manager for synchronization runs.
//!
//! The scheduler runs the reconciler for every character with at least one
//! enabled tower, hourly via cron and on demand via the admin API. Runs for
//! different characters proceed fully in parallel; runs for the same
//! character are serialized through a per-character lock so two runs can
//! never race on the same event records or produce duplicate remote events.

use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    client::posmon::PosmonClient,
    config::GoogleConfig,
    data::tower::TowerRepository,
    error::Error,
    service::sync::{RunOutcome, SyncRun},
};

pub mod config;

/// Drives periodic and on-demand synchronization runs.
///
/// Lock handles are created lazily, one per character, and live for the
/// lifetime of the service. The map only ever grows; at the expected scale
/// (one entry per character that ever synchronized) that is a handful of
/// mutexes, not worth an eviction scheme.
pub struct SyncScheduler {
    db: DatabaseConnection,
    http: reqwest::Client,
    google: GoogleConfig,
    posmon: PosmonClient,
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl SyncScheduler {
    /// Creates a new instance of [`SyncScheduler`]
    pub fn new(
        db: DatabaseConnection,
        http: reqwest::Client,
        google: GoogleConfig,
        posmon: PosmonClient,
    ) -> Self {
        Self {
            db,
            http,
            google,
            posmon,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Registers the periodic run with the cron scheduler and starts it.
    pub async fn start(self: &Arc<Self>) -> Result<(), Error> {
        let sched = JobScheduler::new().await?;
        let scheduler = Arc::clone(self);

        sched
            .add(Job::new_async(config::CRON_EXPRESSION, move |_, _| {
                let scheduler = Arc::clone(&scheduler);

                Box::pin(async move {
                    if let Err(e) = scheduler.run_for_all().await {
                        tracing::error!("Error running scheduled update run: {:?}", e);
                    }
                })
            })?)
            .await?;

        sched.start().await?;

        Ok(())
    }

    /// Runs the reconciler for every character with at least one enabled
    /// tower.
    ///
    /// One run is launched per character, all concurrently; a failed run is
    /// logged and never aborts its siblings. Returns once every launched run
    /// has reached a terminal state.
    pub async fn run_for_all(self: &Arc<Self>) -> Result<(), Error> {
        let char_ids = TowerRepository::new(&self.db).distinct_char_ids().await?;

        tracing::info!("Starting update run for {} character(s)", char_ids.len());

        let handles: Vec<_> = char_ids
            .into_iter()
            .map(|char_id| {
                let scheduler = Arc::clone(self);
                tokio::spawn(async move {
                    match scheduler.run_for_char(char_id).await {
                        Ok(RunOutcome::Committed) => {
                            tracing::debug!("Update run succeeded for char_id={}", char_id)
                        }
                        Ok(RunOutcome::Aborted(reason)) => {
                            tracing::warn!(
                                "Update run aborted for char_id={}: {:?}",
                                char_id,
                                reason
                            )
                        }
                        Err(e) => {
                            tracing::warn!("Update run failed for char_id={}: {:?}", char_id, e)
                        }
                    }
                })
            })
            .collect();

        // A panicked run is already logged by the runtime; siblings still
        // complete.
        let _ = futures::future::join_all(handles).await;

        tracing::info!("Update run done");

        Ok(())
    }

    /// Runs the reconciler for one character under that character's lock.
    ///
    /// Blocks until the lock is free when a run is already in flight, then
    /// proceeds. An on-demand request is never dropped and never runs
    /// concurrently with another run for the same character.
    pub async fn run_for_char(&self, char_id: i64) -> Result<RunOutcome, Error> {
        let lock = self.lock_for(char_id).await;
        let _guard = lock.lock().await;

        SyncRun::new(&self.db, &self.http, &self.google, &self.posmon, char_id)
            .run()
            .await
    }

    async fn lock_for(&self, char_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(char_id).or_default())
    }
}
