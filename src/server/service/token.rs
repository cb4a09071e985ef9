use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::server::{
    config::GoogleConfig, data::token::TokenRepository, error::token::TokenError,
    model::token::OauthToken,
};

/// Response body of the Google OAuth token endpoint for a refresh-token
/// grant. Google typically omits `refresh_token` on renewal, in which case
/// the stored one stays valid.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

pub struct TokenService<'a> {
    db: &'a DatabaseConnection,
    http: &'a reqwest::Client,
    google: &'a GoogleConfig,
}

impl<'a> TokenService<'a> {
    /// Creates a new instance of [`TokenService`]
    pub fn new(
        db: &'a DatabaseConnection,
        http: &'a reqwest::Client,
        google: &'a GoogleConfig,
    ) -> Self {
        Self { db, http, google }
    }

    /// Fetches and decodes the stored credential for a character
    pub async fn get(&self, char_id: i64) -> Result<Option<OauthToken>, TokenError> {
        let tokens = TokenRepository::new(self.db);

        match tokens.get_google_oauth(char_id).await? {
            Some(model) => Ok(Some(serde_json::from_str(&model.value)?)),
            None => Ok(None),
        }
    }

    /// Stores a credential for a character, replacing any previous one
    pub async fn set(&self, char_id: i64, token: &OauthToken) -> Result<(), TokenError> {
        let tokens = TokenRepository::new(self.db);
        let value = serde_json::to_string(token)?;

        tokens.set_google_oauth(char_id, &value).await?;

        Ok(())
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// The credential is mutated in place and the renewed value is persisted
    /// before returning. Fails with [`TokenError::NotRenewable`] when no
    /// refresh token is present; that is terminal until the character
    /// re-authorizes out of band.
    pub async fn renew(&self, char_id: i64, token: &mut OauthToken) -> Result<(), TokenError> {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or(TokenError::NotRenewable)?;

        let response = self
            .http
            .post(&self.google.token_url)
            .form(&[
                ("refresh_token", refresh_token.as_str()),
                ("client_id", self.google.client_id.as_str()),
                ("client_secret", self.google.client_secret.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::RefreshStatus(status));
        }

        let renewed = response.json::<RefreshResponse>().await?;
        token.access_token = renewed.access_token;
        token.expires = Utc::now() + Duration::seconds(renewed.expires_in);
        if let Some(new_refresh) = renewed.refresh_token {
            token.refresh_token = Some(new_refresh);
        }

        self.set(char_id, token).await
    }
}
