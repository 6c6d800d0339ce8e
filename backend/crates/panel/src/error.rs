//! Panel Error Types
//!
//! This module provides panel-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::telegram::TelegramError;
use thiserror::Error;

/// Panel-specific result type alias
pub type PanelResult<T> = Result<T, PanelError>;

/// Panel-specific error variants
///
/// The `Display` text of the first three variants is part of the public
/// response contract. Everything else is rendered with a generic message.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Neither the path nor the query carried a client identifier
    #[error("uuid is required")]
    ClientIdRequired,

    /// The resolver does not know the identifier
    #[error("uuid not found")]
    ClientNotFound,

    /// The resolver itself failed
    #[error("failed to query expiry time")]
    ExpiryQueryFailed(#[source] Box<PanelError>),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Telegram Bot API error
    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),

    /// File system error (backup files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PanelError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PanelError::ClientIdRequired => ErrorKind::BadRequest,
            PanelError::ClientNotFound => ErrorKind::NotFound,
            PanelError::Telegram(_) => ErrorKind::BadGateway,
            PanelError::ExpiryQueryFailed(_)
            | PanelError::Database(_)
            | PanelError::Io(_)
            | PanelError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        match self {
            PanelError::ClientIdRequired
            | PanelError::ClientNotFound
            | PanelError::ExpiryQueryFailed(_) => self.to_string(),
            _ => self.kind().as_str().to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.public_message())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            PanelError::ExpiryQueryFailed(source) => {
                tracing::error!(error = %source, "Client expiry lookup failed");
            }
            PanelError::Database(e) => {
                tracing::error!(error = %e, "Panel database error");
            }
            PanelError::Internal(msg) => {
                tracing::error!(message = %msg, "Panel internal error");
            }
            PanelError::Telegram(e) => {
                tracing::warn!(error = %e, "Telegram request failed");
            }
            PanelError::Io(e) => {
                tracing::warn!(error = %e, "Panel I/O error");
            }
            _ => {
                tracing::debug!(error = %self, "Panel error");
            }
        }
    }
}

impl IntoResponse for PanelError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<PanelError> for AppError {
    fn from(err: PanelError) -> Self {
        err.to_app_error().with_source(err)
    }
}
