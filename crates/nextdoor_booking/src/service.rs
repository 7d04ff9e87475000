// --- File: crates/nextdoor_booking/src/service.rs ---
//! Calendar provider adapters.
//!
//! [`InMemoryCalendarService`] is used when no external calendar is configured and doubles as
//! the calendar in tests. [`GoogleCalendarService`] (feature `gcal`) talks to Google Calendar.

use chrono::{DateTime, Utc};
use nextdoor_common::services::{
    BoxFuture, BusyPeriod, CalendarError, CalendarEvent, CalendarEventResult, CalendarService,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

fn parse_event_time(value: &str, field: &str) -> Result<DateTime<Utc>, CalendarError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CalendarError::TimeParse(format!("Invalid {}: {}", field, e)))
}

#[derive(Debug, Clone)]
struct StoredEvent {
    id: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    event: CalendarEvent,
    status: String,
}

/// Calendar kept in process memory, one event list per calendar id.
#[derive(Debug, Default)]
pub struct InMemoryCalendarService {
    events: Mutex<HashMap<String, Vec<StoredEvent>>>,
}

impl InMemoryCalendarService {
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> MutexGuard<'_, HashMap<String, Vec<StoredEvent>>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn busy_between(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Vec<BusyPeriod> {
        let events = self.events();
        let mut busy: Vec<BusyPeriod> = events
            .get(calendar_id)
            .into_iter()
            .flatten()
            .filter(|e| e.status != "cancelled")
            .filter(|e| e.start < end_time && e.end > start_time)
            .map(|e| (e.start, e.end))
            .collect();
        busy.sort_by_key(|k| k.0);
        busy
    }

    /// Adds a busy block that did not come from a booking, e.g. the owner's own appointment.
    pub fn add_busy(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        summary: &str,
    ) -> String {
        let id = format!("busy-{}", uuid::Uuid::new_v4());
        let event = CalendarEvent {
            start_time: start.to_rfc3339(),
            end_time: end.to_rfc3339(),
            summary: summary.to_string(),
            description: None,
            attendee_email: None,
        };
        self.events()
            .entry(calendar_id.to_string())
            .or_default()
            .push(StoredEvent {
                id: id.clone(),
                start,
                end,
                event,
                status: "confirmed".to_string(),
            });
        id
    }

    pub fn event_status(&self, calendar_id: &str, event_id: &str) -> Option<String> {
        self.events()
            .get(calendar_id)?
            .iter()
            .find(|e| e.id == event_id)
            .map(|e| e.status.clone())
    }

    pub fn event_summary(&self, calendar_id: &str, event_id: &str) -> Option<String> {
        self.events()
            .get(calendar_id)?
            .iter()
            .find(|e| e.id == event_id)
            .map(|e| e.event.summary.clone())
    }
}

impl CalendarService for InMemoryCalendarService {
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, CalendarError> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move { Ok(self.busy_between(&calendar_id, start_time, end_time)) })
    }

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, CalendarError> {
        let calendar_id = calendar_id.to_string();

        Box::pin(async move {
            let start = parse_event_time(&event.start_time, "start_time")?;
            let end = parse_event_time(&event.end_time, "end_time")?;
            if end <= start {
                return Err(CalendarError::InvalidRange);
            }

            let mut events = self.events();
            let calendar = events.entry(calendar_id).or_default();
            let conflict = calendar
                .iter()
                .any(|e| e.status != "cancelled" && start < e.end && end > e.start);
            if conflict {
                return Err(CalendarError::Conflict);
            }

            let id = format!("event-{}", uuid::Uuid::new_v4());
            debug!("Created in-memory calendar event {}", id);
            calendar.push(StoredEvent {
                id: id.clone(),
                start,
                end,
                event,
                status: "confirmed".to_string(),
            });

            Ok(CalendarEventResult {
                event_id: Some(id),
                status: "confirmed".to_string(),
            })
        })
    }

    fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        _notify_attendees: bool,
    ) -> BoxFuture<'_, (), CalendarError> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();

        Box::pin(async move {
            // Deleting something that is already gone counts as success.
            if let Some(calendar) = self.events().get_mut(&calendar_id) {
                calendar.retain(|e| e.id != event_id);
            }
            Ok(())
        })
    }

    fn mark_event_cancelled(
        &self,
        calendar_id: &str,
        event_id: &str,
        _notify_attendees: bool,
    ) -> BoxFuture<'_, CalendarEventResult, CalendarError> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();

        Box::pin(async move {
            let mut events = self.events();
            let stored = events
                .get_mut(&calendar_id)
                .and_then(|calendar| calendar.iter_mut().find(|e| e.id == event_id))
                .ok_or_else(|| CalendarError::EventNotFound(event_id.clone()))?;
            stored.status = "cancelled".to_string();
            Ok(CalendarEventResult {
                event_id: Some(stored.id.clone()),
                status: stored.status.clone(),
            })
        })
    }
}

#[cfg(feature = "gcal")]
pub use google::GoogleCalendarService;

#[cfg(feature = "gcal")]
mod google {
    use super::*;
    use crate::auth::HubType;
    use google_calendar3::api::{
        Event, EventAttendee, EventDateTime, FreeBusyRequest, FreeBusyRequestItem,
    };
    use std::sync::Arc;
    use tracing::{info, warn};

    fn api_error(err: google_calendar3::Error) -> CalendarError {
        let message = err.to_string();
        if message.contains("404") {
            CalendarError::EventNotFound(message)
        } else {
            CalendarError::Api(message)
        }
    }

    fn send_updates(notify_attendees: bool) -> &'static str {
        if notify_attendees {
            "all"
        } else {
            "none"
        }
    }

    /// Google Calendar implementation of [`CalendarService`].
    pub struct GoogleCalendarService {
        calendar_hub: Arc<HubType>,
    }

    impl GoogleCalendarService {
        pub fn new(calendar_hub: Arc<HubType>) -> Self {
            Self { calendar_hub }
        }
    }

    impl CalendarService for GoogleCalendarService {
        /// Free/busy query over `[start_time, end_time)`, sorted by start.
        fn get_busy_times(
            &self,
            calendar_id: &str,
            start_time: DateTime<Utc>,
            end_time: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<BusyPeriod>, CalendarError> {
            let calendar_id = calendar_id.to_string();
            let calendar_hub = self.calendar_hub.clone();

            Box::pin(async move {
                let req = FreeBusyRequest {
                    time_min: Some(start_time),
                    time_max: Some(end_time),
                    time_zone: Some("UTC".to_string()),
                    items: Some(vec![FreeBusyRequestItem {
                        id: Some(calendar_id.clone()),
                        ..Default::default()
                    }]),
                    ..Default::default()
                };

                let (_response, freebusy) = calendar_hub
                    .freebusy()
                    .query(req)
                    .doit()
                    .await
                    .map_err(api_error)?;

                let mut busy_periods = Vec::new();
                let periods = freebusy
                    .calendars
                    .as_ref()
                    .and_then(|calendars| calendars.get(&calendar_id))
                    .and_then(|info| info.busy.as_ref());
                for period in periods.into_iter().flatten() {
                    match (period.start, period.end) {
                        (Some(start), Some(end)) => busy_periods.push((start, end)),
                        _ => info!("Skipping busy period with missing start/end: {:?}", period),
                    }
                }
                busy_periods.sort_by_key(|k| k.0);
                Ok(busy_periods)
            })
        }

        /// Inserts an event after checking the range is free.
        fn create_event(
            &self,
            calendar_id: &str,
            event: CalendarEvent,
        ) -> BoxFuture<'_, CalendarEventResult, CalendarError> {
            let calendar_id = calendar_id.to_string();
            let calendar_hub = self.calendar_hub.clone();

            Box::pin(async move {
                let start_dt = parse_event_time(&event.start_time, "start_time")?;
                let end_dt = parse_event_time(&event.end_time, "end_time")?;
                if end_dt <= start_dt {
                    return Err(CalendarError::InvalidRange);
                }

                let busy = self.get_busy_times(&calendar_id, start_dt, end_dt).await?;
                if busy
                    .iter()
                    .any(|(busy_start, busy_end)| start_dt < *busy_end && end_dt > *busy_start)
                {
                    return Err(CalendarError::Conflict);
                }

                let new_event = Event {
                    summary: Some(event.summary),
                    description: event.description,
                    attendees: event.attendee_email.map(|email| {
                        vec![EventAttendee {
                            email: Some(email),
                            ..Default::default()
                        }]
                    }),
                    start: Some(EventDateTime {
                        date_time: Some(start_dt),
                        time_zone: Some("UTC".to_string()),
                        ..Default::default()
                    }),
                    end: Some(EventDateTime {
                        date_time: Some(end_dt),
                        time_zone: Some("UTC".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                };

                let (_response, created) = calendar_hub
                    .events()
                    .insert(new_event, &calendar_id)
                    .doit()
                    .await
                    .map_err(api_error)?;

                Ok(CalendarEventResult {
                    event_id: created.id,
                    status: created.status.unwrap_or_else(|| "confirmed".to_string()),
                })
            })
        }

        /// Deletes an event. A missing event counts as deleted; an event Google refuses to
        /// delete outright is restored to confirmed first and deleted again.
        fn delete_event(
            &self,
            calendar_id: &str,
            event_id: &str,
            notify_attendees: bool,
        ) -> BoxFuture<'_, (), CalendarError> {
            let calendar_id = calendar_id.to_string();
            let event_id = event_id.to_string();
            let calendar_hub = self.calendar_hub.clone();

            Box::pin(async move {
                let event = match calendar_hub.events().get(&calendar_id, &event_id).doit().await {
                    Ok((_response, event)) => event,
                    Err(e) => {
                        return match api_error(e) {
                            CalendarError::EventNotFound(_) => Ok(()),
                            other => Err(other),
                        }
                    }
                };
                let status = event.status.as_deref().unwrap_or("confirmed");

                let first_attempt = calendar_hub
                    .events()
                    .delete(&calendar_id, &event_id)
                    .send_updates(send_updates(notify_attendees))
                    .doit()
                    .await;

                let err = match first_attempt {
                    Ok(_) => return Ok(()),
                    Err(e) => e,
                };
                let message = err.to_string();
                if status != "cancelled" && !message.contains("403") && !message.contains("400") {
                    return Err(CalendarError::Api(message));
                }

                let restored = Event {
                    status: Some("confirmed".to_string()),
                    sequence: Some(event.sequence.map_or(1, |n| n + 1)),
                    ..Default::default()
                };
                let restore = calendar_hub
                    .events()
                    .patch(restored, &calendar_id, &event_id)
                    .send_updates("none")
                    .doit()
                    .await;

                match restore {
                    Ok(_) => {
                        calendar_hub
                            .events()
                            .delete(&calendar_id, &event_id)
                            .send_updates(send_updates(notify_attendees))
                            .doit()
                            .await
                            .map_err(api_error)?;
                        Ok(())
                    }
                    Err(_) => {
                        warn!(
                            "Could not fully delete event {}, attempted restore and delete",
                            event_id
                        );
                        Ok(())
                    }
                }
            })
        }

        /// Patches the event status to cancelled, bumping its sequence number.
        fn mark_event_cancelled(
            &self,
            calendar_id: &str,
            event_id: &str,
            notify_attendees: bool,
        ) -> BoxFuture<'_, CalendarEventResult, CalendarError> {
            let calendar_id = calendar_id.to_string();
            let event_id = event_id.to_string();
            let calendar_hub = self.calendar_hub.clone();

            Box::pin(async move {
                let (_response, event) = calendar_hub
                    .events()
                    .get(&calendar_id, &event_id)
                    .doit()
                    .await
                    .map_err(api_error)?;

                let cancelled = Event {
                    status: Some("cancelled".to_string()),
                    sequence: Some(event.sequence.map_or(1, |n| n + 1)),
                    ..Default::default()
                };

                let (_response, updated) = calendar_hub
                    .events()
                    .patch(cancelled, &calendar_id, &event_id)
                    .send_updates(send_updates(notify_attendees))
                    .doit()
                    .await
                    .map_err(api_error)?;

                Ok(CalendarEventResult {
                    event_id: updated.id,
                    status: updated.status.unwrap_or_else(|| "cancelled".to_string()),
                })
            })
        }
    }
}
