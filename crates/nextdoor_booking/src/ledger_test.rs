#[cfg(test)]
mod tests {
    use crate::availability::AvailabilityIndex;
    use crate::error::{BookingError, PAST_BOOKING};
    use crate::ledger::{BookingLedger, BookingStatus, NewBooking};
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn request(date: &str, time: &str) -> NewBooking {
        NewBooking {
            name: Some("Test User".into()),
            email: Some("test@example.com".into()),
            phone: Some("555-0123".into()),
            date: Some(date.into()),
            time: Some(time.into()),
            service: None,
            notes: None,
        }
    }

    fn ledger() -> (BookingLedger, AvailabilityIndex) {
        (BookingLedger::new("House Cleaning"), AvailabilityIndex::new())
    }

    #[test]
    fn test_create_fills_defaults_and_marks_slot() {
        let (mut ledger, mut index) = ledger();
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 15, 0, 0).unwrap();

        let booking = ledger
            .create(&request("2025-10-20", "10:00"), &mut index, today(), now)
            .unwrap();

        assert_eq!(booking.id, 1);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.service, "House Cleaning");
        assert_eq!(booking.notes, "");
        assert_eq!(booking.created_at, now);
        assert!(index.is_booked(booking.date, booking.time));
    }

    #[test]
    fn test_booking_serializes_in_client_shape() {
        let (mut ledger, mut index) = ledger();
        let mut fields = request("2025-10-20", "09:00");
        fields.service = Some("Deep Cleaning".into());
        let booking = ledger
            .create(&fields, &mut index, today(), Utc::now())
            .unwrap();

        let value = serde_json::to_value(&booking).unwrap();
        assert_eq!(value["date"], json!("2025-10-20"));
        assert_eq!(value["time"], json!("09:00"));
        assert_eq!(value["status"], json!("confirmed"));
        assert_eq!(value["service"], json!("Deep Cleaning"));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("calendarEventId").is_none());
    }

    #[test]
    fn test_validation_order() {
        let today = today();

        let mut missing = request("2020-01-01", "10:00");
        missing.email = Some("not-an-email".into());
        missing.phone = Some("   ".into());
        assert_eq!(
            missing.validate(today),
            Err(BookingError::MissingField { field: "phone" })
        );

        let mut bad_email = request("2020-01-01", "10:00");
        bad_email.email = Some("not-an-email".into());
        assert_eq!(bad_email.validate(today), Err(BookingError::InvalidEmail));

        assert_eq!(
            request("2020-01-01", "nope").validate(today),
            Err(BookingError::PastDate(PAST_BOOKING))
        );
        assert_eq!(
            request("01/10/2025", "10:00").validate(today),
            Err(BookingError::InvalidDateFormat)
        );
        assert_eq!(
            request("2025-10-20", "nope").validate(today),
            Err(BookingError::InvalidTimeFormat)
        );
    }

    #[test]
    fn test_today_is_bookable_yesterday_is_not() {
        let (mut ledger, mut index) = ledger();
        assert!(ledger
            .create(&request("2025-10-01", "17:00"), &mut index, today(), Utc::now())
            .is_ok());
        assert_eq!(
            ledger
                .create(&request("2025-09-30", "17:00"), &mut index, today(), Utc::now())
                .unwrap_err(),
            BookingError::PastDate(PAST_BOOKING)
        );
    }

    #[test]
    fn test_taken_slot_is_rejected() {
        let (mut ledger, mut index) = ledger();
        ledger
            .create(&request("2025-10-20", "10:00"), &mut index, today(), Utc::now())
            .unwrap();

        let err = ledger
            .create(&request("2025-10-20", "10:00"), &mut index, today(), Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            BookingError::SlotUnavailable {
                date: "2025-10-20".into(),
                time: "10:00".into()
            }
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let (mut ledger, mut index) = ledger();
        let first = ledger
            .create(&request("2025-10-20", "10:00"), &mut index, today(), Utc::now())
            .unwrap();
        ledger.cancel(first.id).unwrap();

        let second = ledger
            .create(&request("2025-10-20", "11:00"), &mut index, today(), Utc::now())
            .unwrap();
        assert!(second.id > first.id);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_cancel_is_soft_and_repeatable() {
        let (mut ledger, mut index) = ledger();
        let booking = ledger
            .create(&request("2025-10-20", "10:00"), &mut index, today(), Utc::now())
            .unwrap();

        let (cancelled, changed) = ledger.cancel(booking.id).unwrap();
        assert!(changed);
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let (again, changed) = ledger.cancel(booking.id).unwrap();
        assert!(!changed);
        assert_eq!(again.status, BookingStatus::Cancelled);

        // still queryable, and the slot stays taken
        assert_eq!(ledger.get(booking.id).unwrap().status, BookingStatus::Cancelled);
        assert!(index.is_booked(
            booking.date,
            NaiveTime::from_hms_opt(10, 0, 0).unwrap()
        ));
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let (mut ledger, _) = ledger();
        assert_eq!(ledger.get(42).unwrap_err(), BookingError::booking_not_found());
        assert_eq!(ledger.cancel(42).unwrap_err(), BookingError::booking_not_found());
        assert!(ledger.is_empty());
    }
}
