use sea_orm::DatabaseConnection;

use crate::server::{
    client::google::CalendarClient,
    config::GoogleConfig,
    data::{event::EventRepository, setting::SettingRepository},
    error::{calendar::CalendarError, token::TokenError, Error},
    service::token::TokenService,
};

/// Summary given to calendars this service creates.
pub const DEFAULT_CALENDAR_SUMMARY: &str = "EVE POS events";

/// Administrative calendar operations invoked explicitly by the character,
/// outside the periodic synchronization runs.
pub struct CalendarService<'a> {
    db: &'a DatabaseConnection,
    http: &'a reqwest::Client,
    google: &'a GoogleConfig,
}

impl<'a> CalendarService<'a> {
    /// Creates a new instance of [`CalendarService`]
    pub fn new(
        db: &'a DatabaseConnection,
        http: &'a reqwest::Client,
        google: &'a GoogleConfig,
    ) -> Self {
        Self { db, http, google }
    }

    async fn client_for<'b>(
        &self,
        tokens: &'b TokenService<'b>,
        char_id: i64,
    ) -> Result<CalendarClient<'b>, Error>
    where
        'a: 'b,
    {
        let credential = tokens
            .get(char_id)
            .await?
            .ok_or(TokenError::Missing(char_id))?;

        Ok(CalendarClient::new(
            self.http,
            tokens,
            self.google,
            char_id,
            credential,
        ))
    }

    /// Returns the character's calendar id, creating a calendar remotely
    /// when none is configured or the configured one no longer exists.
    ///
    /// This is the only path that recreates a calendar; the periodic run
    /// aborts instead so a deletion on the Google side is never silently
    /// papered over.
    pub async fn ensure_calendar(&self, char_id: i64) -> Result<String, Error> {
        let tokens = TokenService::new(self.db, self.http, self.google);
        let client = self.client_for(&tokens, char_id).await?;
        let settings = SettingRepository::new(self.db);

        if let Some(cal_id) = settings.get(char_id, SettingRepository::CALENDAR).await? {
            match client.get_calendar(&cal_id).await {
                Ok(_) => return Ok(cal_id),
                Err(CalendarError::NotFound) => {
                    tracing::info!(
                        "Configured calendar for char_id={} no longer exists, recreating",
                        char_id
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        let calendar = client.add_calendar(DEFAULT_CALENDAR_SUMMARY).await?;
        settings
            .set(char_id, SettingRepository::CALENDAR, &calendar.id)
            .await?;

        tracing::info!(
            "Created calendar {} for char_id={}",
            calendar.id,
            char_id
        );

        Ok(calendar.id)
    }

    /// Deletes every tracked remote event for the character and clears the
    /// local records. Events already gone remotely still get their records
    /// removed.
    pub async fn purge_events(&self, char_id: i64) -> Result<usize, Error> {
        let tokens = TokenService::new(self.db, self.http, self.google);
        let client = self.client_for(&tokens, char_id).await?;
        let settings = SettingRepository::new(self.db);
        let events = EventRepository::new(self.db);

        let cal_id = settings
            .get(char_id, SettingRepository::CALENDAR)
            .await?
            .ok_or(CalendarError::NotFound)?;

        let mut deleted = 0;
        for record in events.get_for_char(char_id).await? {
            match client.delete_event(&cal_id, &record.event_id).await {
                Ok(()) | Err(CalendarError::NotFound) => {}
                Err(err) => return Err(err.into()),
            }
            events.delete(char_id, record.orbit_id).await?;
            deleted += 1;
        }

        tracing::info!("Purged {} event(s) for char_id={}", deleted, char_id);

        Ok(deleted)
    }
}
