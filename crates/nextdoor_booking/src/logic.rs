// --- File: crates/nextdoor_booking/src/logic.rs ---
//! Smart suggestions: candidate slots from the calendar-integrated grid, filtered against
//! calendar busy time and the availability index, then scored.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc,
    Weekday,
};
use chrono_tz::Tz;
use nextdoor_common::services::{BusyPeriod, CalendarService};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::availability::AvailabilityIndex;
use crate::error::BookingError;
use crate::scoring::{CandidateSlot, SchedulingPreferences, ScoredSlot, SlotScorer};
use crate::slots::{parse_time, SlotGenerator};
use crate::store::SchedulingStore;

pub const DEFAULT_DURATION_MINUTES: u32 = 30;
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;
pub const MAX_WEEK_RANGE_DAYS: i64 = 31;

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SmartSuggestions {
    pub suggestions: Vec<ScoredSlot>,
    pub all_slots: Vec<CandidateSlot>,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DayTopSlot {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2025-10-21"))]
    pub date: NaiveDate,
    pub top_slot: ScoredSlot,
}

/// Sorts and coalesces overlapping or touching busy periods.
pub fn merge_busy_periods(busy: &[BusyPeriod]) -> Vec<BusyPeriod> {
    let mut sorted = busy.to_vec();
    sorted.sort_by_key(|(start, _)| *start);

    let mut merged: Vec<BusyPeriod> = Vec::with_capacity(sorted.len());
    for (start, end) in sorted {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

fn overlaps_busy(start: DateTime<Utc>, end: DateTime<Utc>, merged_busy: &[BusyPeriod]) -> bool {
    merged_busy
        .iter()
        .any(|(busy_start, busy_end)| start < *busy_end && end > *busy_start)
}

pub(crate) fn local_instant(
    time_zone: Tz,
    date: NaiveDate,
    time: NaiveTime,
) -> Option<DateTime<Tz>> {
    match time_zone.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(t) => Some(t),
        LocalResult::Ambiguous(first, _) => Some(first),
        LocalResult::None => None,
    }
}

/// UTC bounds of the business-local calendar day.
pub fn day_bounds(time_zone: Tz, date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = local_instant(time_zone, date, NaiveTime::MIN)?;
    let next = date.succ_opt()?;
    let end = local_instant(time_zone, next, NaiveTime::MIN)?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Everything a candidate must satisfy besides the grid itself.
pub struct CandidateFilter<'a> {
    pub merged_busy: &'a [BusyPeriod],
    pub index: &'a AvailabilityIndex,
    /// Candidates must start strictly after this instant.
    pub not_before: DateTime<Utc>,
    /// Zone used to render `start_time`/`end_time`.
    pub display_zone: Tz,
}

/// Free stretches of `duration_minutes` on `date`, one per grid start time.
///
/// Non-working days yield nothing. A candidate must end by the grid's end hour, stay clear of
/// lunch and of every merged busy period, start in the future, and cover no time taken in the
/// index.
pub fn candidate_slots(
    generator: &SlotGenerator,
    time_zone: Tz,
    date: NaiveDate,
    duration_minutes: u32,
    filter: &CandidateFilter<'_>,
) -> Vec<CandidateSlot> {
    let grid = generator.config();
    if !grid.is_working_day(date) {
        return Vec::new();
    }
    let length = Duration::minutes(i64::from(duration_minutes));
    let day_end = grid.day_end_minutes();

    generator
        .generate(date)
        .into_iter()
        .filter_map(|slot| {
            let start_minutes = slot.start_time.num_seconds_from_midnight() / 60;
            let end_minutes = u64::from(start_minutes) + u64::from(duration_minutes);
            if end_minutes > u64::from(day_end) {
                return None;
            }
            let end_minutes = u32::try_from(end_minutes).ok()?;
            if grid.overlaps_lunch(start_minutes, end_minutes)
                || filter
                    .index
                    .any_taken_between(date, slot.start_time, end_minutes)
            {
                return None;
            }
            let start = local_instant(time_zone, date, slot.start_time)?.with_timezone(&Utc);
            let end = start + length;
            if start <= filter.not_before || overlaps_busy(start, end, filter.merged_busy) {
                return None;
            }
            Some(CandidateSlot {
                date,
                time: slot.start_time,
                start_time: start.with_timezone(&filter.display_zone).fixed_offset(),
                end_time: end.with_timezone(&filter.display_zone).fixed_offset(),
                duration_minutes,
            })
        })
        .collect()
}

/// Applies the optional time window and day list from the caller's preferences.
pub fn apply_preferences(
    candidates: Vec<CandidateSlot>,
    preferences: &SchedulingPreferences,
) -> Result<Vec<CandidateSlot>, BookingError> {
    let window = match &preferences.preferred_time_range {
        Some(range) => Some((parse_time(&range.start)?, parse_time(&range.end)?)),
        None => None,
    };
    let days = match &preferences.preferred_days {
        Some(names) => Some(
            names
                .iter()
                .map(|name| {
                    Weekday::from_str(name.trim()).map_err(|_| {
                        BookingError::invalid_request(format!("Unknown preferred day: {}", name))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        None => None,
    };

    Ok(candidates
        .into_iter()
        .filter(|c| window.map_or(true, |(from, to)| c.time >= from && c.time < to))
        .filter(|c| {
            days.as_ref()
                .map_or(true, |days| days.contains(&c.date.weekday()))
        })
        .collect())
}

/// Produces and ranks smart suggestions over the calendar-integrated grid.
pub struct SmartScheduler {
    store: Arc<SchedulingStore>,
    calendar: Arc<dyn CalendarService>,
    calendar_id: String,
    generator: SlotGenerator,
    time_zone: Tz,
    scorer: SlotScorer,
    suggestion_count: usize,
}

impl SmartScheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<SchedulingStore>,
        calendar: Arc<dyn CalendarService>,
        calendar_id: impl Into<String>,
        generator: SlotGenerator,
        time_zone: Tz,
        scorer: SlotScorer,
        suggestion_count: usize,
    ) -> Self {
        Self {
            store,
            calendar,
            calendar_id: calendar_id.into(),
            generator,
            time_zone,
            scorer,
            suggestion_count,
        }
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Free candidates for one day, before preferences and scoring.
    pub async fn candidates(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
        now: DateTime<Utc>,
        display_zone: Tz,
    ) -> Result<Vec<CandidateSlot>, BookingError> {
        if !self.generator.config().is_working_day(date) {
            return Ok(Vec::new());
        }
        let (day_start, day_end) = day_bounds(self.time_zone, date)
            .ok_or_else(|| BookingError::invalid_request(format!("No such local day: {}", date)))?;

        let busy = self
            .calendar
            .get_busy_times(&self.calendar_id, day_start, day_end)
            .await?;
        let merged_busy = merge_busy_periods(&busy);

        Ok(self.store.with_index(|index| {
            candidate_slots(
                &self.generator,
                self.time_zone,
                date,
                duration_minutes,
                &CandidateFilter {
                    merged_busy: &merged_busy,
                    index,
                    not_before: now,
                    display_zone,
                },
            )
        }))
    }

    /// Top suggestions for `date` plus every candidate considered.
    pub async fn suggestions(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
        preferences: &SchedulingPreferences,
        now: DateTime<Utc>,
        display_zone: Tz,
    ) -> Result<SmartSuggestions, BookingError> {
        if duration_minutes == 0 || duration_minutes > MAX_DURATION_MINUTES {
            return Err(BookingError::invalid_request(format!(
                "Duration must be between 1 and {} minutes",
                MAX_DURATION_MINUTES
            )));
        }

        let all_slots = self
            .candidates(date, duration_minutes, now, display_zone)
            .await?;
        let preferred = apply_preferences(all_slots.clone(), preferences)?;

        let mut ranked = self
            .scorer
            .score(preferred, preferences, duration_minutes, self.store.as_ref())
            .await;
        ranked.truncate(self.suggestion_count);

        info!(
            %date,
            duration_minutes,
            candidates = all_slots.len(),
            suggestions = ranked.len(),
            "Computed smart suggestions"
        );
        Ok(SmartSuggestions {
            suggestions: ranked,
            all_slots,
        })
    }

    /// The best slot of each day from `start` to `end` inclusive. Days without candidates are
    /// left out.
    pub async fn week_optimal_slots(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        duration_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<DayTopSlot>, BookingError> {
        if end < start {
            return Err(BookingError::invalid_request("endDate must not be before startDate"));
        }
        if (end - start).num_days() >= MAX_WEEK_RANGE_DAYS {
            return Err(BookingError::invalid_request(format!(
                "Date range is limited to {} days",
                MAX_WEEK_RANGE_DAYS
            )));
        }

        let preferences = SchedulingPreferences::default();
        let mut optimal = Vec::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            let day = self
                .suggestions(date, duration_minutes, &preferences, now, self.time_zone)
                .await?;
            if let Some(top_slot) = day.suggestions.into_iter().next() {
                optimal.push(DayTopSlot { date, top_slot });
            } else {
                debug!(%date, "No candidates for day");
            }
        }
        Ok(optimal)
    }
}

/// Resolves an IANA zone name, falling back to `fallback` for anything unknown.
pub fn resolve_time_zone(name: Option<&str>, fallback: Tz) -> Tz {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => Tz::from_str(name).unwrap_or_else(|_| {
            tracing::warn!("Unknown time zone '{}', using {}", name, fallback);
            fallback
        }),
        None => fallback,
    }
}
