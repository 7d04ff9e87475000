#[cfg(test)]
mod tests {
    use crate::logic::merge_busy_periods;
    use crate::scoring::{score_slot, CandidateSlot, SlotSignals, BASE_SCORE};
    use crate::slots::{generate, LunchBreak, SlotGenerator, SlotGridConfig};
    use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (0i64..3650).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
        })
    }

    proptest! {
        #[test]
        fn test_slot_count_and_spacing(
            date in any_date(),
            start_hour in 0u32..23,
            span in 1u32..12,
            slot_minutes in prop::sample::select(vec![10u32, 15, 20, 30, 60]),
        ) {
            let end_hour = (start_hour + span).min(24);
            let slots = generate(date, start_hour, end_hour, slot_minutes).unwrap();

            prop_assert_eq!(slots.len() as u32, (end_hour - start_hour) * 60 / slot_minutes);
            let first = NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap();
            prop_assert_eq!(slots[0].start_time, first);
            for pair in slots.windows(2) {
                let gap = (pair[1].start_time - pair[0].start_time).num_minutes();
                prop_assert_eq!(gap, i64::from(slot_minutes));
            }
        }

        #[test]
        fn test_lunch_removes_only_lunch_starts(
            date in any_date(),
            slot_minutes in prop::sample::select(vec![15u32, 30, 60]),
        ) {
            let with_lunch = SlotGenerator::new(SlotGridConfig {
                start_hour: 8,
                end_hour: 18,
                slot_minutes,
                lunch: Some(LunchBreak { start_hour: 12, end_hour: 13 }),
                working_days: None,
            }).unwrap();
            let slots = with_lunch.generate(date);

            prop_assert_eq!(slots.len() as u32, (10 - 1) * 60 / slot_minutes);
            prop_assert!(slots.iter().all(|s| s.hour() != 12));
        }

        #[test]
        fn test_score_never_below_guaranteed_adjustments(
            day_offset in 0i64..14,
            hour in 0u32..24,
            minute in prop::sample::select(vec![0u32, 30]),
            duration in 1u32..240,
            pattern_score in prop::option::of(0i64..100),
            has_buffer in any::<bool>(),
            has_break_before in any::<bool>(),
        ) {
            let date = NaiveDate::from_ymd_opt(2025, 10, 20).unwrap() + Duration::days(day_offset);
            let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
            let start = Utc.from_utc_datetime(&date.and_time(time));
            let slot = CandidateSlot {
                date,
                time,
                start_time: start.fixed_offset(),
                end_time: (start + Duration::minutes(i64::from(duration))).fixed_offset(),
                duration_minutes: duration,
            };
            let signals = SlotSignals { pattern_score, has_buffer, has_break_before };

            let first = score_slot(slot.clone(), duration, signals);
            let again = score_slot(slot, duration, signals);
            prop_assert_eq!(&first, &again);

            // only the post-lunch penalty can pull a slot below base
            let floor = BASE_SCORE - if hour == 13 { 10 } else { 0 };
            prop_assert!(first.score >= floor);
            prop_assert!(!first.reason.is_empty());
        }

        #[test]
        fn test_merged_periods_are_disjoint_and_cover_input(
            raw in prop::collection::vec((0i64..1440, 1i64..240), 0..12),
        ) {
            let base = Utc.with_ymd_and_hms(2025, 10, 21, 0, 0, 0).unwrap();
            let busy: Vec<_> = raw
                .iter()
                .map(|(offset, len)| {
                    let start = base + Duration::minutes(*offset);
                    (start, start + Duration::minutes(*len))
                })
                .collect();

            let merged = merge_busy_periods(&busy);
            for pair in merged.windows(2) {
                prop_assert!(pair[0].1 < pair[1].0);
            }
            for (start, end) in &busy {
                prop_assert!(merged.iter().any(|(s, e)| s <= start && end <= e));
            }
        }
    }
}
