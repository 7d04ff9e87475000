#[cfg(test)]
mod tests {
    use crate::patterns::{BookingPattern, MockPatternSource};
    use crate::scoring::{
        rank, score_slot, CandidateSlot, DayPreference, SchedulingPreferences, SlotScorer,
        SlotSignals, TimeCategory, BASE_SCORE, FALLBACK_REASON,
    };
    use crate::service::InMemoryCalendarService;
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
    use nextdoor_common::services::{
        BoxFuture, BusyPeriod, CalendarError, CalendarEvent, CalendarEventResult, CalendarService,
    };
    use nextdoor_config::ScoringConfig;
    use std::sync::Arc;

    // 2025-10-21 is a Tuesday
    fn candidate(y: i32, m: u32, d: u32, h: u32, min: u32, duration: u32) -> CandidateSlot {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let time = NaiveTime::from_hms_opt(h, min, 0).unwrap();
        let start = Utc.from_utc_datetime(&date.and_time(time));
        CandidateSlot {
            date,
            time,
            start_time: start.fixed_offset(),
            end_time: (start + Duration::minutes(i64::from(duration))).fixed_offset(),
            duration_minutes: duration,
        }
    }

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, d, h, m, 0).unwrap()
    }

    #[test]
    fn test_prime_midweek_slot_with_buffer() {
        let scored = score_slot(
            candidate(2025, 10, 21, 10, 0, 30),
            30,
            SlotSignals {
                has_buffer: true,
                ..Default::default()
            },
        );

        // 100 + 30 morning + 15 midweek + 20 buffer + 10 duration
        assert_eq!(scored.score, 175);
        assert_eq!(scored.time_category, Some(TimeCategory::MorningPrime));
        assert_eq!(scored.day_preference, Some(DayPreference::Midweek));
        assert_eq!(scored.reason, "Most popular morning time");
        assert_eq!(
            scored.reasons,
            vec!["Most popular morning time", "Best day for focus", "Good buffer time"]
        );
    }

    #[test]
    fn test_post_lunch_long_slot_after_break() {
        // Monday 13:00, one hour, free half hour before
        let scored = score_slot(
            candidate(2025, 10, 20, 13, 0, 60),
            60,
            SlotSignals {
                has_break_before: true,
                ..Default::default()
            },
        );

        // 100 + 10 Monday - 10 post lunch + 15 break
        assert_eq!(scored.score, 115);
        assert!(scored.post_lunch);
        assert!(scored.has_break_before);
        assert_eq!(scored.reason, "Fresh start after break");
    }

    #[test]
    fn test_break_only_counts_for_long_slots() {
        let scored = score_slot(
            candidate(2025, 10, 20, 13, 0, 30),
            30,
            SlotSignals {
                has_break_before: true,
                ..Default::default()
            },
        );
        assert!(!scored.has_break_before);
        assert_eq!(scored.score, 100 + 10 - 10 + 10);
    }

    #[test]
    fn test_plain_slot_falls_back_to_generic_reason() {
        // Saturday noon, 45 minutes: no adjustment applies
        let scored = score_slot(candidate(2025, 10, 25, 12, 0, 45), 45, SlotSignals::default());
        assert_eq!(scored.score, BASE_SCORE);
        assert_eq!(scored.reason, FALLBACK_REASON);
        assert!(scored.reasons.is_empty());
    }

    #[test]
    fn test_pattern_match_reason_and_bonus() {
        let scored = score_slot(
            candidate(2025, 10, 24, 16, 30, 15),
            15,
            SlotSignals {
                pattern_score: Some(20),
                ..Default::default()
            },
        );
        // 100 + 15 late + 5 Friday + 20 pattern + 15 duration
        assert_eq!(scored.score, 155);
        assert!(scored.pattern_match);
        assert_eq!(
            scored.reasons,
            vec!["End of day availability", "Matches your preferences"]
        );
    }

    #[test]
    fn test_rank_breaks_ties_by_start() {
        let later = score_slot(candidate(2025, 10, 21, 11, 0, 30), 30, SlotSignals::default());
        let earlier = score_slot(candidate(2025, 10, 21, 10, 0, 30), 30, SlotSignals::default());
        let best = score_slot(
            candidate(2025, 10, 21, 14, 0, 30),
            30,
            SlotSignals {
                has_buffer: true,
                ..Default::default()
            },
        );

        let ranked = rank(vec![later.clone(), best.clone(), earlier.clone()]);
        assert_eq!(ranked, vec![best, earlier, later]);
    }

    #[tokio::test]
    async fn test_scorer_consults_patterns_and_calendar() {
        let calendar = Arc::new(InMemoryCalendarService::new());
        calendar.add_busy("primary", utc(21, 10, 0), utc(21, 10, 30), "Owner errand");
        let scorer = SlotScorer::new(calendar, "primary", &ScoringConfig::default());

        let mut patterns = MockPatternSource::new();
        patterns
            .expect_pattern_for()
            .withf(|user, weekday, _| {
                user.eq_ignore_ascii_case("ann@example.com") && *weekday == Weekday::Tue
            })
            .times(2)
            .returning(|_, _, hour| {
                (hour == 14).then_some(BookingPattern {
                    booking_count: 2,
                    cancelled_count: 0,
                })
            });

        let preferences = SchedulingPreferences {
            user_id: Some("ann@example.com".into()),
            ..Default::default()
        };
        let ranked = scorer
            .score(
                vec![
                    candidate(2025, 10, 21, 10, 30, 30),
                    candidate(2025, 10, 21, 14, 0, 30),
                ],
                &preferences,
                30,
                &patterns,
            )
            .await;

        // 10:30 sits right after a busy block: no buffer, no pattern
        // 100 + 30 + 15 + 10 = 155
        // 14:00 has buffer and history: 100 + 25 + 15 + 20 + 20 + 10 = 190
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].slot.time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(ranked[0].score, 190);
        assert!(ranked[0].pattern_match && ranked[0].has_buffer);
        assert_eq!(ranked[1].score, 155);
        assert!(!ranked[1].has_buffer);
    }

    #[tokio::test]
    async fn test_scorer_skips_patterns_without_user() {
        let scorer = SlotScorer::new(
            Arc::new(InMemoryCalendarService::new()),
            "primary",
            &ScoringConfig::default(),
        );
        let mut patterns = MockPatternSource::new();
        patterns.expect_pattern_for().never();

        let ranked = scorer
            .score(
                vec![candidate(2025, 10, 21, 9, 0, 30)],
                &SchedulingPreferences::default(),
                30,
                &patterns,
            )
            .await;
        // 100 + 20 early + 15 midweek + 20 buffer + 10 duration
        assert_eq!(ranked[0].score, 165);
    }

    struct UnreachableCalendar;

    impl CalendarService for UnreachableCalendar {
        fn get_busy_times(
            &self,
            _calendar_id: &str,
            _start_time: DateTime<Utc>,
            _end_time: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<BusyPeriod>, CalendarError> {
            Box::pin(async {
                Err::<Vec<BusyPeriod>, CalendarError>(CalendarError::Api("down".into()))
            })
        }

        fn create_event(
            &self,
            _calendar_id: &str,
            _event: CalendarEvent,
        ) -> BoxFuture<'_, CalendarEventResult, CalendarError> {
            Box::pin(async {
                Err::<CalendarEventResult, CalendarError>(CalendarError::Api("down".into()))
            })
        }

        fn delete_event(
            &self,
            _calendar_id: &str,
            _event_id: &str,
            _notify_attendees: bool,
        ) -> BoxFuture<'_, (), CalendarError> {
            Box::pin(async { Err::<(), CalendarError>(CalendarError::Api("down".into())) })
        }

        fn mark_event_cancelled(
            &self,
            _calendar_id: &str,
            _event_id: &str,
            _notify_attendees: bool,
        ) -> BoxFuture<'_, CalendarEventResult, CalendarError> {
            Box::pin(async {
                Err::<CalendarEventResult, CalendarError>(CalendarError::Api("down".into()))
            })
        }
    }

    #[tokio::test]
    async fn test_calendar_failure_fails_open() {
        let scorer = SlotScorer::new(
            Arc::new(UnreachableCalendar),
            "primary",
            &ScoringConfig::default(),
        );
        let mut patterns = MockPatternSource::new();
        patterns.expect_pattern_for().never();

        let ranked = scorer
            .score(
                vec![candidate(2025, 10, 22, 15, 0, 60)],
                &SchedulingPreferences::default(),
                60,
                &patterns,
            )
            .await;

        assert!(ranked[0].has_buffer);
        assert!(ranked[0].has_break_before);
        // 100 + 25 + 15 + 20 buffer + 15 break
        assert_eq!(ranked[0].score, 175);
    }
}
