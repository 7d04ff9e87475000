// --- File: crates/nextdoor_booking/src/ledger.rs ---
//! Booking entities and the rules for creating and cancelling them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::availability::AvailabilityIndex;
use crate::error::{BookingError, PAST_BOOKING};
use crate::slots::{hhmm, parse_date, parse_time};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2025-10-20"))]
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "10:00"))]
    pub time: NaiveTime,
    pub service: String,
    pub notes: String,
    pub status: BookingStatus,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_event_id: Option<String>,
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    /// Key under which this customer's booking habits are tracked.
    pub fn customer_key(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Booking request as submitted by the client. Every field is optional so that a missing
/// field is reported by validation rather than by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewBooking {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "2025-10-20"))]
    pub date: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "10:00"))]
    pub time: Option<String>,
    pub service: Option<String>,
    pub notes: Option<String>,
}

/// A request that passed field validation and is ready to be checked against availability.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBooking {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service: Option<String>,
    pub notes: Option<String>,
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, BookingError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(BookingError::MissingField { field }),
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl NewBooking {
    /// Field checks in order: presence, email shape, date format and not past, time format.
    /// `today` is the current date in the business time zone.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedBooking, BookingError> {
        let name = required(&self.name, "name")?;
        let email = required(&self.email, "email")?;
        let phone = required(&self.phone, "phone")?;
        let date = required(&self.date, "date")?;
        let time = required(&self.time, "time")?;

        if !EMAIL_PATTERN.is_match(&email) {
            return Err(BookingError::InvalidEmail);
        }

        let date = parse_date(&date)?;
        if date < today {
            return Err(BookingError::PastDate(PAST_BOOKING));
        }

        let time = parse_time(&time)?;

        Ok(ValidatedBooking {
            name,
            email,
            phone,
            date,
            time,
            service: optional(&self.service),
            notes: optional(&self.notes),
        })
    }
}

/// Owns every booking ever made. Bookings are never removed and ids are never reused.
#[derive(Debug)]
pub struct BookingLedger {
    bookings: Vec<Booking>,
    next_id: u64,
    default_service: String,
}

impl BookingLedger {
    pub fn new(default_service: impl Into<String>) -> Self {
        Self {
            bookings: Vec::new(),
            next_id: 1,
            default_service: default_service.into(),
        }
    }

    /// Validates, checks the slot, appends, and marks the slot booked in `index`.
    pub fn create(
        &mut self,
        fields: &NewBooking,
        index: &mut AvailabilityIndex,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        let valid = fields.validate(today)?;

        if index.is_booked(valid.date, valid.time) {
            debug!(date = %valid.date, time = %valid.time, "Rejecting booking for a taken slot");
            return Err(BookingError::SlotUnavailable {
                date: valid.date.to_string(),
                time: hhmm::format(valid.time),
            });
        }

        let booking = Booking {
            id: self.next_id,
            name: valid.name,
            email: valid.email,
            phone: valid.phone,
            date: valid.date,
            time: valid.time,
            service: valid
                .service
                .unwrap_or_else(|| self.default_service.clone()),
            notes: valid.notes.unwrap_or_default(),
            status: BookingStatus::Confirmed,
            created_at: now,
            calendar_event_id: None,
        };
        self.next_id += 1;

        index.mark_booked(booking.date, booking.time);
        self.bookings.push(booking.clone());
        info!(id = booking.id, date = %booking.date, time = %booking.time, "Booking confirmed");
        Ok(booking)
    }

    pub fn get(&self, id: u64) -> Result<&Booking, BookingError> {
        self.bookings
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(BookingError::booking_not_found)
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Booking, BookingError> {
        self.bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(BookingError::booking_not_found)
    }

    /// Flips the status to cancelled. The slot stays taken. Returns the booking and whether
    /// this call changed it; cancelling twice is a no-op.
    pub fn cancel(&mut self, id: u64) -> Result<(Booking, bool), BookingError> {
        let booking = self.get_mut(id)?;
        let changed = booking.is_confirmed();
        if changed {
            booking.status = BookingStatus::Cancelled;
            info!(id, "Booking cancelled");
        }
        Ok((booking.clone(), changed))
    }

    pub fn attach_event(&mut self, id: u64, event_id: String) -> Result<(), BookingError> {
        self.get_mut(id)?.calendar_event_id = Some(event_id);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.iter()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}
