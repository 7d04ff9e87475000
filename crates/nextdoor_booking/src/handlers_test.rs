#[cfg(test)]
mod tests {
    use crate::error::BookingError;
    use crate::handlers::{
        booking_stats_handler, cancel_booking_handler, create_booking_handler,
        get_next_available_handler, list_bookings_handler, BookingState, BookingStats,
        ADMIN_TOKEN_HEADER,
    };
    use crate::ledger::{Booking, BookingStatus, NewBooking};
    use crate::service::InMemoryCalendarService;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, HeaderValue, StatusCode};
    use axum::Json;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use nextdoor_common::services::{CalendarError, CalendarService};
    use nextdoor_common::FixedClock;
    use nextdoor_config::{AdminConfig, AppConfig, GcalConfig};
    use std::sync::Arc;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 10, 1, 16, 0, 0).unwrap(),
        ))
    }

    fn synced_config() -> AppConfig {
        AppConfig {
            use_gcal: true,
            gcal: Some(GcalConfig {
                sync_bookings: true,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn state(config: AppConfig, calendar: Arc<InMemoryCalendarService>) -> Arc<BookingState> {
        Arc::new(BookingState::new(Arc::new(config), calendar, clock()).unwrap())
    }

    fn request(time: &str) -> NewBooking {
        NewBooking {
            name: Some("Test User".into()),
            email: Some("test@example.com".into()),
            phone: Some("555-0123".into()),
            date: Some("2025-10-20".into()),
            time: Some(time.into()),
            ..Default::default()
        }
    }

    fn booking_on(id: u64, date: NaiveDate, status: BookingStatus) -> Booking {
        Booking {
            id,
            name: "Test User".into(),
            email: "test@example.com".into(),
            phone: "555-0123".into(),
            date,
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            service: "House Cleaning".into(),
            notes: String::new(),
            status,
            created_at: Utc::now(),
            calendar_event_id: None,
        }
    }

    #[test]
    fn test_stats_count_confirmed_by_appointment_date() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 28).unwrap();
        let day = |d: u32, m: u32| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
        let bookings = vec![
            booking_on(1, day(28, 10), BookingStatus::Confirmed),
            booking_on(2, day(28, 10), BookingStatus::Cancelled),
            booking_on(3, day(31, 10), BookingStatus::Confirmed),
            booking_on(4, day(3, 11), BookingStatus::Confirmed),
            booking_on(5, day(4, 11), BookingStatus::Confirmed),
            booking_on(6, day(2, 10), BookingStatus::Confirmed),
        ];

        assert_eq!(
            BookingStats::collect(&bookings, today),
            BookingStats {
                total_bookings: 5,
                today_bookings: 1,
                week_bookings: 3,
                month_bookings: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_configured_admin_token_must_match() {
        let config = AppConfig {
            admin: AdminConfig {
                token: Some("s3cret".into()),
            },
            ..Default::default()
        };
        let state = state(config, Arc::new(InMemoryCalendarService::new()));

        let mut headers = HeaderMap::new();
        let missing = list_bookings_handler(State(state.clone()), headers.clone()).await;
        assert_eq!(missing.unwrap_err(), BookingError::Unauthorized("Unauthorized"));

        headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static("guess"));
        let wrong = booking_stats_handler(State(state.clone()), headers.clone()).await;
        assert_eq!(wrong.unwrap_err(), BookingError::Unauthorized("Unauthorized"));

        headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static("s3cret"));
        let Json(listing) = list_bookings_handler(State(state), headers).await.unwrap();
        assert_eq!(listing.total, 0);
    }

    #[tokio::test]
    async fn test_synced_booking_gets_calendar_event() {
        let calendar = Arc::new(InMemoryCalendarService::new());
        let state = state(synced_config(), calendar.clone());

        let (status, Json(created)) =
            create_booking_handler(State(state.clone()), Ok(Json(request("10:00"))))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let event_id = created.booking.calendar_event_id.clone().unwrap();
        assert_eq!(
            calendar.event_summary("primary", &event_id).as_deref(),
            Some("House Cleaning - Test User")
        );

        let Json(cancelled) =
            cancel_booking_handler(State(state.clone()), Path(created.booking.id.to_string()))
                .await
                .unwrap();
        assert_eq!(cancelled.message, "Booking cancelled successfully");
        assert_eq!(
            calendar.event_status("primary", &event_id).as_deref(),
            Some("cancelled")
        );
    }

    #[tokio::test]
    async fn test_failed_calendar_push_rolls_back() {
        let calendar = Arc::new(InMemoryCalendarService::new());
        // 10:00 MDT is 16:00 UTC
        calendar.add_busy(
            "primary",
            Utc.with_ymd_and_hms(2025, 10, 20, 16, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 10, 20, 17, 0, 0).unwrap(),
            "Owner errand",
        );
        let state = state(synced_config(), calendar);

        let err = create_booking_handler(State(state.clone()), Ok(Json(request("10:00"))))
            .await
            .unwrap_err();
        assert_eq!(err, BookingError::UpstreamProvider(CalendarError::Conflict));

        let date = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap();
        assert!(!state.store.is_booked(date, NaiveTime::from_hms_opt(10, 0, 0).unwrap()));
        assert_eq!(
            state.store.get_booking(1).unwrap().status,
            BookingStatus::Cancelled
        );

        // the next slot still books, with a fresh id
        let (_, Json(created)) = create_booking_handler(State(state), Ok(Json(request("11:00"))))
            .await
            .unwrap();
        assert_eq!(created.booking.id, 2);
    }

    #[tokio::test]
    async fn test_cancel_fails_when_calendar_event_is_gone() {
        let calendar = Arc::new(InMemoryCalendarService::new());
        let state = state(synced_config(), calendar.clone());
        let (_, Json(created)) =
            create_booking_handler(State(state.clone()), Ok(Json(request("10:00"))))
                .await
                .unwrap();
        let event_id = created.booking.calendar_event_id.clone().unwrap();
        calendar.delete_event("primary", &event_id, false).await.unwrap();

        let err = cancel_booking_handler(State(state.clone()), Path("1".into()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BookingError::UpstreamProvider(CalendarError::EventNotFound(_))
        ));
        assert!(state.store.get_booking(1).unwrap().is_confirmed());
    }

    #[tokio::test]
    async fn test_next_available_reports_exhausted_horizon() {
        let state = state(AppConfig::default(), Arc::new(InMemoryCalendarService::new()));
        let first = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let hours: Vec<NaiveTime> = (8..18)
            .map(|h| NaiveTime::from_hms_opt(h, 0, 0).unwrap())
            .collect();
        for date in first.iter_days().take(31) {
            state.store.block(date, &hours, None);
        }

        let Json(response) = get_next_available_handler(State(state)).await;
        assert!(response.next_slot.is_none());
        assert_eq!(
            response.message.as_deref(),
            Some("No available slots in the next 30 days")
        );
    }
}
