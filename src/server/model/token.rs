use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A character's Google OAuth credential as stored in the token table.
///
/// Mutated in place on renewal; the token service persists the new value
/// back, so this type never holds a reference to its own storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OauthToken {
    pub access_token: String,
    pub expires: DateTime<Utc>,
    pub refresh_token: Option<String>,
}

impl OauthToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires
    }
}
