use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nextdoor_booking::availability::AvailabilityIndex;
use nextdoor_booking::finder::NextAvailableFinder;
use nextdoor_booking::logic::{candidate_slots, merge_busy_periods, CandidateFilter};
use nextdoor_booking::slots::SlotGenerator;
use nextdoor_config::SlotGridSettings;

const EDMONTON: Tz = chrono_tz::America::Edmonton;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 21).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 16, 0, 0).unwrap()
}

// Half-hour busy blocks every hour from 15:00 UTC, some overlapping their neighbours.
fn busy_periods(count: usize) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let base = Utc.with_ymd_and_hms(2025, 10, 21, 15, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let start = base + Duration::minutes(20 * i as i64);
            (start, start + Duration::minutes(30))
        })
        .collect()
}

/// Books every slot of the basic grid for the first `days` days.
fn booked_index(generator: &SlotGenerator, days: u32) -> AvailabilityIndex {
    let mut index = AvailabilityIndex::new();
    let first = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
    for date in first.iter_days().take(days as usize) {
        for slot in generator.generate(date) {
            index.mark_booked(date, slot.start_time);
        }
    }
    index
}

fn benchmark_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("slot_generation");
    let basic = SlotGenerator::from_settings(&SlotGridSettings::basic_hourly()).unwrap();
    let calendar = SlotGenerator::from_settings(&SlotGridSettings::calendar_integrated()).unwrap();

    group.bench_function("basic_hourly", |b| b.iter(|| basic.generate(black_box(day()))));
    group.bench_function("calendar_integrated", |b| {
        b.iter(|| calendar.generate(black_box(day())))
    });
    group.finish();
}

fn benchmark_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidate_slots");
    let generator = SlotGenerator::from_settings(&SlotGridSettings::calendar_integrated()).unwrap();
    let index = AvailabilityIndex::new();

    for count in [0usize, 5, 50] {
        let busy = busy_periods(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &busy, |b, busy| {
            b.iter(|| {
                let merged = merge_busy_periods(black_box(busy));
                let filter = CandidateFilter {
                    merged_busy: &merged,
                    index: &index,
                    not_before: now(),
                    display_zone: EDMONTON,
                };
                candidate_slots(&generator, EDMONTON, day(), 60, &filter)
            })
        });
    }
    group.finish();
}

fn benchmark_next_available(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_available");
    let generator = SlotGenerator::from_settings(&SlotGridSettings::basic_hourly()).unwrap();
    let finder = NextAvailableFinder::new(generator.clone(), EDMONTON, 120, 30);

    for booked_days in [0u32, 10, 30] {
        let index = booked_index(&generator, booked_days);
        group.bench_with_input(
            BenchmarkId::from_parameter(booked_days),
            &index,
            |b, index| b.iter(|| finder.find_next(black_box(index), now())),
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_generation,
    benchmark_candidates,
    benchmark_next_available
);
criterion_main!(benches);

