use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::InternalServerError;

#[derive(Error, Debug)]
pub enum PosmonError {
    #[error("posmon feed returned status {0}")]
    Status(StatusCode),
    #[error("posmon feed entry could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("posmon feed timestamp {0:?} is not valid")]
    Timestamp(String),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl IntoResponse for PosmonError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
