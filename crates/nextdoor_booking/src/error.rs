// --- File: crates/nextdoor_booking/src/error.rs ---
use axum::response::{IntoResponse, Response};
use nextdoor_common::services::CalendarError;
use nextdoor_common::{
    config_error, conflict, external_service_error, not_found, timeout_error, validation_error,
    NextdoorError,
};
use thiserror::Error;
use tracing::error;

pub const PAST_BOOKING: &str = "Cannot book appointments in the past";
pub const PAST_AVAILABILITY: &str = "Cannot check availability for past dates";

/// Everything that can go wrong between a request arriving and the scheduling state changing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Missing required fields")]
    MissingField { field: &'static str },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("{0}")]
    PastDate(&'static str),

    #[error("Invalid date format")]
    InvalidDateFormat,

    #[error("Invalid time format")]
    InvalidTimeFormat,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    /// A slot grid whose hours or step cannot produce slots. Only reachable through configuration.
    #[error("Invalid slot range: {0}")]
    InvalidRange(String),

    #[error("The {date} {time} slot is no longer available")]
    SlotUnavailable { date: String, time: String },

    #[error("Calendar provider error: {0}")]
    UpstreamProvider(#[from] CalendarError),
}

impl BookingError {
    pub fn booking_not_found() -> Self {
        BookingError::NotFound("Booking not found".to_string())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        BookingError::InvalidRequest(message.into())
    }
}

impl From<BookingError> for NextdoorError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MissingField { .. }
            | BookingError::InvalidEmail
            | BookingError::PastDate(_)
            | BookingError::InvalidDateFormat
            | BookingError::InvalidTimeFormat
            | BookingError::InvalidRequest(_) => validation_error(err),
            BookingError::NotFound(message) => not_found(message),
            BookingError::Unauthorized(message) => NextdoorError::AuthError(message.to_string()),
            BookingError::InvalidRange(message) => config_error(message),
            BookingError::SlotUnavailable { .. } => conflict(err),
            BookingError::UpstreamProvider(CalendarError::Timeout(ms)) => {
                timeout_error(format!("Calendar did not respond within {} ms", ms))
            }
            BookingError::UpstreamProvider(source) => external_service_error("Calendar", source),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            BookingError::UpstreamProvider(_) | BookingError::InvalidRange(_)
        ) {
            error!("Request failed: {}", self);
        }
        NextdoorError::from(self).into_response()
    }
}
