use std::collections::HashMap;

use crate::server::{
    error::posmon::PosmonError,
    model::posmon::{PosmonRecord, Tower},
};

/// Client for the posmon monitoring feed.
///
/// The feed is fetched as a single flat HTTP GET covering every corporation;
/// each run filters the snapshot down to the towers it cares about.
#[derive(Clone, Debug)]
pub struct PosmonClient {
    http: reqwest::Client,
    url: String,
}

impl PosmonClient {
    /// Creates a new instance of [`PosmonClient`]
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Fetches the full tower snapshot, keyed by orbit id.
    pub async fn fetch_all(&self) -> Result<HashMap<i64, Tower>, PosmonError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PosmonError::Status(status));
        }

        let body = response.text().await?;
        let mut towers = HashMap::new();
        for line in body.lines().filter(|line| !line.trim().is_empty()) {
            let record: PosmonRecord = serde_json::from_str(line)?;
            let cache_ts = record.cache_ts_utc()?;
            let PosmonRecord {
                corporation,
                towers: entries,
                ..
            } = record;
            for entry in entries {
                let tower = Tower::new(entry, cache_ts, corporation.clone());
                towers.insert(tower.orbit_id, tower);
            }
        }

        Ok(towers)
    }
}
