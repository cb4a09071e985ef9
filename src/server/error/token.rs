use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::server::{error::InternalServerError, model::api::ErrorDto};

#[derive(Error, Debug)]
pub enum TokenError {
    /// No credential stored for the character. The character has to complete
    /// the Google authorization flow before calendar operations can run.
    #[error("no stored Google credential for character {0}")]
    Missing(i64),
    /// The access token expired and there is no refresh token to renew it
    /// with. Terminal until the character re-authorizes out of band.
    #[error("access token expired and no refresh token is available")]
    NotRenewable,
    #[error("token refresh request returned status {0}")]
    RefreshStatus(StatusCode),
    #[error("stored credential is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        match self {
            Self::Missing(_) | Self::NotRenewable => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto {
                    error: "Google authorization required, please authorize".to_string(),
                }),
            )
                .into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}
