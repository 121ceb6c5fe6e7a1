//! Error handling for SwingReg
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy, including the mapping from
//! domain errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the SwingReg application
#[derive(Error, Debug)]
pub enum SwingRegError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("A registration with this email already exists: {email}")]
    DuplicateEmail { email: String },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Registration not found: {registration_id}")]
    RegistrationNotFound { registration_id: i64 },

    #[error("No active event found")]
    NoActiveEvent,

    #[error("Registration is currently closed for this event")]
    RegistrationClosed,

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Email delivery error: {0}")]
    Delivery(String),
}

/// Result type alias for SwingReg operations
pub type Result<T> = std::result::Result<T, SwingRegError>;

impl From<lettre::transport::smtp::Error> for SwingRegError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        SwingRegError::Delivery(err.to_string())
    }
}

impl From<lettre::error::Error> for SwingRegError {
    fn from(err: lettre::error::Error) -> Self {
        SwingRegError::Delivery(err.to_string())
    }
}

impl From<lettre::address::AddressError> for SwingRegError {
    fn from(err: lettre::address::AddressError) -> Self {
        SwingRegError::Delivery(err.to_string())
    }
}

impl SwingRegError {
    /// HTTP status code this error maps to at the request boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            SwingRegError::Validation(_)
            | SwingRegError::DuplicateEmail { .. }
            | SwingRegError::NoActiveEvent
            | SwingRegError::RegistrationClosed => StatusCode::BAD_REQUEST,
            SwingRegError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            SwingRegError::Forbidden(_) => StatusCode::FORBIDDEN,
            SwingRegError::EventNotFound { .. } | SwingRegError::RegistrationNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            SwingRegError::Database(_)
            | SwingRegError::Migration(_)
            | SwingRegError::Config(_)
            | SwingRegError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message; internal detail stays in the logs for 5xx errors
    fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            match self {
                SwingRegError::DuplicateEmail { .. } => {
                    "A registration with this email already exists".to_string()
                }
                other => other.to_string(),
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for SwingRegError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        }

        let body = ErrorBody {
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_mapping() {
        assert_eq!(
            SwingRegError::Validation("year must be 2020 or later".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SwingRegError::DuplicateEmail {
                email: "a@b.fi".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SwingRegError::NoActiveEvent.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SwingRegError::RegistrationClosed.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(
            SwingRegError::Unauthenticated("token required".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SwingRegError::Forbidden("admin access required".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_not_found_mapping() {
        assert_eq!(
            SwingRegError::EventNotFound { event_id: 7 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SwingRegError::RegistrationNotFound { registration_id: 3 }.status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = SwingRegError::Config("JWT secret is required".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }
}
