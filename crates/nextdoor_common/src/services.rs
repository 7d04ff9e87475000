// --- File: crates/nextdoor_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! The scheduling core depends on these traits only, so the production adapters
//! (Google Calendar, the system clock) can be swapped for in-memory doubles in tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A busy interval reported by a calendar provider, `[start, end)`.
pub type BusyPeriod = (DateTime<Utc>, DateTime<Utc>);

/// Errors a calendar provider can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Calendar API error: {0}")]
    Api(String),
    #[error("Failed to parse time: {0}")]
    TimeParse(String),
    #[error("End time must be after start time")]
    InvalidRange,
    #[error("Calendar event conflicts with an existing event")]
    Conflict,
    #[error("Calendar event not found: {0}")]
    EventNotFound(String),
    #[error("Calendar request timed out after {0} ms")]
    Timeout(u64),
}

/// A trait for calendar provider operations.
///
/// Implementations must be cheap to share behind an `Arc` and safe to call concurrently.
pub trait CalendarService: Send + Sync {
    /// Get busy time intervals overlapping `[start_time, end_time)`, sorted by start.
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, CalendarError>;

    /// Create a calendar event.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, CalendarError>;

    /// Delete a calendar event.
    fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        notify_attendees: bool,
    ) -> BoxFuture<'_, (), CalendarError>;

    /// Mark a calendar event as cancelled without deleting it.
    fn mark_event_cancelled(
        &self,
        calendar_id: &str,
        event_id: &str,
        notify_attendees: bool,
    ) -> BoxFuture<'_, CalendarEventResult, CalendarError>;
}

/// An event to be written to the calendar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    /// RFC3339 start of the event.
    pub start_time: String,
    /// RFC3339 end of the event.
    pub end_time: String,
    /// The summary or title of the event.
    pub summary: String,
    /// An optional description of the event.
    pub description: Option<String>,
    /// Customer address to invite, if any.
    pub attendee_email: Option<String>,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEventResult {
    /// The ID of the event.
    pub event_id: Option<String>,
    /// The status of the event.
    pub status: String,
}
