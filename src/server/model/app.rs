use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::server::{client::posmon::PosmonClient, config::GoogleConfig, scheduler::SyncScheduler};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub google: GoogleConfig,
    pub posmon: PosmonClient,
    pub sync: Arc<SyncScheduler>,
}
