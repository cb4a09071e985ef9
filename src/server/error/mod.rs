//! Error types for the poscal server application.
//!
//! This module provides the error handling system for the service, with
//! specialized error types for each remote collaborator (Google Calendar,
//! the Google OAuth token endpoint, the posmon feed). All errors implement
//! `IntoResponse` for Axum HTTP responses and use `thiserror` for ergonomic
//! error definitions.

pub mod calendar;
pub mod posmon;
pub mod token;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::server::{
    error::{calendar::CalendarError, posmon::PosmonError, token::TokenError},
    model::api::ErrorDto,
};

/// Main error type for the poscal server application.
///
/// Aggregates the domain-specific error types and external library errors
/// into a single unified error type, using `thiserror`'s `#[from]` attribute
/// so the `?` operator converts automatically. The `IntoResponse`
/// implementation maps errors to appropriate HTTP responses.
#[derive(Error, Debug)]
pub enum Error {
    /// Google Calendar API error (event/calendar CRUD failures).
    #[error(transparent)]
    CalendarError(#[from] CalendarError),
    /// Credential error (missing, malformed, or unrenewable tokens).
    #[error(transparent)]
    TokenError(#[from] TokenError),
    /// Posmon feed error (fetch or decode failures).
    #[error(transparent)]
    PosmonError(#[from] PosmonError),
    /// Parse error (failed to derive a value from otherwise valid data).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Database error (query failures, connection issues).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::CalendarError(err) => err.into_response(),
            Self::TokenError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type converting any displayable error into a 500 response.
///
/// Logs the full error message for debugging but returns a generic message
/// to the client so internal details are not exposed.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
