use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::server::{
    config::GoogleConfig,
    error::calendar::CalendarError,
    model::{
        google::{CalendarPayload, CalendarResource, EventPayload, EventResource, CALENDAR_KIND},
        token::OauthToken,
    },
    service::token::TokenService,
};

/// Client for the Google Calendar v3 REST API, scoped to one character.
///
/// The credential is held for the lifetime of the client and renewed through
/// the token service: proactively when it is past its expiry, and reactively
/// exactly once when the API answers 401. A second 401 on the same call
/// surfaces as [`CalendarError::Unauthorized`] so a permanently revoked
/// token cannot loop.
pub struct CalendarClient<'a> {
    http: &'a reqwest::Client,
    tokens: &'a TokenService<'a>,
    google: &'a GoogleConfig,
    char_id: i64,
    credential: Mutex<OauthToken>,
}

impl<'a> CalendarClient<'a> {
    /// Creates a new instance of [`CalendarClient`]
    pub fn new(
        http: &'a reqwest::Client,
        tokens: &'a TokenService<'a>,
        google: &'a GoogleConfig,
        char_id: i64,
        credential: OauthToken,
    ) -> Self {
        Self {
            http,
            tokens,
            google,
            char_id,
            credential: Mutex::new(credential),
        }
    }

    pub async fn get_calendar(&self, cal_id: &str) -> Result<CalendarResource, CalendarError> {
        let url = format!("{}/calendars/{}", self.google.api_url, cal_id);
        self.with_credential(|access| {
            let url = url.clone();
            async move {
                let response = self.http.get(&url).bearer_auth(access).send().await?;
                Self::read_json(response).await
            }
        })
        .await
    }

    pub async fn add_calendar(&self, summary: &str) -> Result<CalendarResource, CalendarError> {
        let url = format!("{}/calendars", self.google.api_url);
        let payload = CalendarPayload {
            kind: CALENDAR_KIND,
            summary: summary.to_string(),
        };
        self.with_credential(|access| {
            let url = url.clone();
            let payload = &payload;
            async move {
                let response = self
                    .http
                    .post(&url)
                    .bearer_auth(access)
                    .json(payload)
                    .send()
                    .await?;
                Self::read_json(response).await
            }
        })
        .await
    }

    pub async fn delete_calendar(&self, cal_id: &str) -> Result<(), CalendarError> {
        let url = format!("{}/calendars/{}", self.google.api_url, cal_id);
        self.with_credential(|access| {
            let url = url.clone();
            async move {
                let response = self.http.delete(&url).bearer_auth(access).send().await?;
                Self::check_status(response).map(|_| ())
            }
        })
        .await
    }

    pub async fn get_event(
        &self,
        cal_id: &str,
        event_id: &str,
    ) -> Result<EventResource, CalendarError> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.google.api_url, cal_id, event_id
        );
        self.with_credential(|access| {
            let url = url.clone();
            async move {
                let response = self.http.get(&url).bearer_auth(access).send().await?;
                Self::read_json(response).await
            }
        })
        .await
    }

    pub async fn add_event(
        &self,
        cal_id: &str,
        payload: &EventPayload,
    ) -> Result<EventResource, CalendarError> {
        let url = format!("{}/calendars/{}/events", self.google.api_url, cal_id);
        self.with_credential(|access| {
            let url = url.clone();
            async move {
                let response = self
                    .http
                    .post(&url)
                    .bearer_auth(access)
                    .json(payload)
                    .send()
                    .await?;
                Self::read_json(response).await
            }
        })
        .await
    }

    pub async fn update_event(
        &self,
        cal_id: &str,
        event_id: &str,
        payload: &EventPayload,
    ) -> Result<EventResource, CalendarError> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.google.api_url, cal_id, event_id
        );
        self.with_credential(|access| {
            let url = url.clone();
            async move {
                let response = self
                    .http
                    .put(&url)
                    .bearer_auth(access)
                    .json(payload)
                    .send()
                    .await?;
                Self::read_json(response).await
            }
        })
        .await
    }

    pub async fn delete_event(&self, cal_id: &str, event_id: &str) -> Result<(), CalendarError> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            self.google.api_url, cal_id, event_id
        );
        self.with_credential(|access| {
            let url = url.clone();
            async move {
                let response = self.http.delete(&url).bearer_auth(access).send().await?;
                Self::check_status(response).map(|_| ())
            }
        })
        .await
    }

    /// Runs one API call with a valid access token.
    ///
    /// Renews the credential up front when it is already past expiry, then
    /// again at most once if the API still rejects it; the retried call's
    /// own 401 is returned as-is.
    async fn with_credential<T, F, Fut>(&self, op: F) -> Result<T, CalendarError>
    where
        F: Fn(String) -> Fut,
        Fut: std::future::Future<Output = Result<T, CalendarError>>,
    {
        let mut credential = self.credential.lock().await;
        if credential.is_expired(chrono::Utc::now()) {
            self.tokens.renew(self.char_id, &mut credential).await?;
        }

        match op(credential.access_token.clone()).await {
            Err(CalendarError::Unauthorized) => {
                self.tokens.renew(self.char_id, &mut credential).await?;
                op(credential.access_token.clone()).await
            }
            result => result,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CalendarError> {
        let response = Self::check_status(response)?;
        Ok(response.json::<T>().await?)
    }

    fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CalendarError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(CalendarError::Unauthorized)
        } else if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            // 410 shows up for events deleted out of band; both mean the
            // resource no longer exists.
            Err(CalendarError::NotFound)
        } else {
            Err(CalendarError::Status(status))
        }
    }
}
