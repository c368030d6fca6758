//! Error types and error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::actions::ActionError;
use crate::filters::FilterError;

/// Admin error type
#[derive(Debug, Error)]
pub enum AdminError {
    /// Bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Malformed filter value or filter argument
    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    /// Action registration or handler failure
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Forbidden (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),
}

impl AdminError {
    /// HTTP status code this error maps to
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Filter(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Action(_) | Self::Database(_) | Self::ServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Admin request failed");
            // Internal details stay in the log
            return (status, "Internal server error").into_response();
        }

        tracing::debug!(error = %self, %status, "Admin request rejected");
        (status, self.to_string()).into_response()
    }
}
