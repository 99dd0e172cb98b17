use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

use crate::drive::DriveError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data caught before any remote call is issued
    #[error("{message}")]
    BadRequest { message: String },

    /// Failure reported by the remote storage service
    #[error(transparent)]
    Drive(#[from] DriveError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            // Every remote failure collapses to a generic server error,
            // whatever status the remote service itself answered with.
            Error::Drive(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message carried in the response body. Remote failures pass the
    /// underlying message through verbatim.
    pub fn detail(&self) -> String {
        match self {
            Error::BadRequest { message } => message.clone(),
            Error::Drive(err) => err.to_string(),
            Error::Other(err) => err.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Drive(_) | Error::Other(_) => {
                tracing::error!("Remote operation failed: {:#}", self);
            }
            Error::BadRequest { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = json!({ "detail": self.detail() });

        (status, axum::response::Json(body)).into_response()
    }
}

/// Type alias for handler results
pub type Result<T> = std::result::Result<T, Error>;
