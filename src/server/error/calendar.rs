use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::server::{
    error::{token::TokenError, InternalServerError},
    model::api::ErrorDto,
};

#[derive(Error, Debug)]
pub enum CalendarError {
    /// The API rejected the access token even after a renewal attempt. The
    /// character has to re-authorize with Google before the next run can
    /// succeed.
    #[error("Google Calendar API rejected the access token")]
    Unauthorized,
    /// The requested calendar or event does not exist remotely. Benign in
    /// several call sites (stale event lookups, idempotent deletes).
    #[error("Google Calendar resource not found")]
    NotFound,
    #[error("Google Calendar API returned status {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl IntoResponse for CalendarError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized | Self::Token(TokenError::NotRenewable) => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto {
                    error: "Google authorization expired, please re-authorize".to_string(),
                }),
            )
                .into_response(),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorDto {
                    error: "Calendar resource not found".to_string(),
                }),
            )
                .into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}
