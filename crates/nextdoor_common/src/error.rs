// --- File: crates/nextdoor_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all NextDoor crates.
///
/// Crates define their own domain errors and implement `From<DomainError> for NextdoorError`,
/// which is what the HTTP layer turns into a response.
#[derive(Error, Debug)]
pub enum NextdoorError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during authentication or authorization
    #[error("{0}")]
    AuthError(String),

    /// Error occurred during validation
    #[error("{0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already taken)
    #[error("{0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("{0}")]
    NotFoundError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for NextdoorError {
    fn status_code(&self) -> u16 {
        match self {
            NextdoorError::ParseError(_) => 400,
            NextdoorError::ConfigError(_) => 500,
            NextdoorError::AuthError(_) => 401,
            NextdoorError::ValidationError(_) => 400,
            NextdoorError::ExternalServiceError { .. } => 500,
            NextdoorError::ConflictError(_) => 409,
            NextdoorError::NotFoundError(_) => 404,
            NextdoorError::TimeoutError(_) => 504,
            NextdoorError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, NextdoorError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, NextdoorError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, NextdoorError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| NextdoorError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, NextdoorError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| NextdoorError::InternalError(format!("{}: {}", f(), error)))
    }
}

impl From<serde_json::Error> for NextdoorError {
    fn from(err: serde_json::Error) -> Self {
        NextdoorError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for NextdoorError {
    fn from(err: std::io::Error) -> Self {
        NextdoorError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> NextdoorError {
    NextdoorError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> NextdoorError {
    NextdoorError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> NextdoorError {
    NextdoorError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> NextdoorError {
    NextdoorError::ConflictError(message.to_string())
}

pub fn timeout_error<T: fmt::Display>(message: T) -> NextdoorError {
    NextdoorError::TimeoutError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> NextdoorError {
    NextdoorError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
