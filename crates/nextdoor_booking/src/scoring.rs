// --- File: crates/nextdoor_booking/src/scoring.rs ---
//! Heuristic ranking of free slots for smart suggestions.
//!
//! Scoring starts at 100 and adds fixed adjustments for time of day, day of week, the
//! requested duration, the customer's booking history, and how much free calendar time
//! surrounds the slot. Calendar lookups fail open: an unreachable calendar counts as free.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc, Weekday,
};
use nextdoor_common::log_recovered;
use nextdoor_common::services::CalendarService;
use nextdoor_config::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use crate::patterns::PatternSource;
use crate::slots::hhmm;

pub const BASE_SCORE: i64 = 100;
pub const FALLBACK_REASON: &str = "Available slot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TimeCategory {
    MorningPrime,
    AfternoonPrime,
    EarlyMorning,
    LateAfternoon,
}

impl TimeCategory {
    pub fn for_hour(hour: u32) -> Option<Self> {
        match hour {
            10 | 11 => Some(TimeCategory::MorningPrime),
            14 | 15 => Some(TimeCategory::AfternoonPrime),
            9 => Some(TimeCategory::EarlyMorning),
            h if h >= 16 => Some(TimeCategory::LateAfternoon),
            _ => None,
        }
    }

    pub fn bonus(self) -> i64 {
        match self {
            TimeCategory::MorningPrime => 30,
            TimeCategory::AfternoonPrime => 25,
            TimeCategory::EarlyMorning => 20,
            TimeCategory::LateAfternoon => 15,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            TimeCategory::MorningPrime => "Most popular morning time",
            TimeCategory::AfternoonPrime => "Optimal afternoon slot",
            TimeCategory::EarlyMorning => "Early bird special",
            TimeCategory::LateAfternoon => "End of day availability",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DayPreference {
    Midweek,
    Monday,
    Friday,
}

impl DayPreference {
    pub fn for_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Tue | Weekday::Wed | Weekday::Thu => Some(DayPreference::Midweek),
            Weekday::Mon => Some(DayPreference::Monday),
            Weekday::Fri => Some(DayPreference::Friday),
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    pub fn bonus(self) -> i64 {
        match self {
            DayPreference::Midweek => 15,
            DayPreference::Monday => 10,
            DayPreference::Friday => 5,
        }
    }
}

/// Caller hints for smart suggestions.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SchedulingPreferences {
    /// Customer whose booking history should be matched (their email address).
    pub user_id: Option<String>,
    /// Only consider slots starting inside this window.
    pub preferred_time_range: Option<PreferredTimeRange>,
    /// Only consider these days ("Mon", "Tuesday", ...).
    pub preferred_days: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PreferredTimeRange {
    #[cfg_attr(feature = "openapi", schema(example = "09:00"))]
    pub start: String,
    #[cfg_attr(feature = "openapi", schema(example = "12:00"))]
    pub end: String,
}

/// A free stretch of `duration_minutes` that could be offered to the customer.
///
/// `date`/`time` are business-local; `start_time`/`end_time` are rendered in the caller's zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CandidateSlot {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2025-10-21"))]
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "10:00"))]
    pub time: NaiveTime,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub start_time: DateTime<FixedOffset>,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub end_time: DateTime<FixedOffset>,
    pub duration_minutes: u32,
}

impl CandidateSlot {
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start_time.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end_time.with_timezone(&Utc)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ScoredSlot {
    #[serde(flatten)]
    pub slot: CandidateSlot,
    pub score: i64,
    /// The highest-priority entry of `reasons`, or "Available slot".
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub reason: &'static str,
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub reasons: Vec<&'static str>,
    pub time_category: Option<TimeCategory>,
    pub day_preference: Option<DayPreference>,
    pub pattern_match: bool,
    pub has_buffer: bool,
    pub post_lunch: bool,
    pub has_break_before: bool,
}

/// Inputs to scoring that come from outside the slot itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotSignals {
    /// Pattern score for the customer at this weekday and hour, when one is known.
    pub pattern_score: Option<i64>,
    pub has_buffer: bool,
    pub has_break_before: bool,
}

pub fn duration_bonus(duration_minutes: u32) -> i64 {
    match duration_minutes {
        30 => 10,
        15 => 15,
        _ => 0,
    }
}

/// Scores one slot. Pure: everything external arrives through `signals`.
pub fn score_slot(slot: CandidateSlot, duration_minutes: u32, signals: SlotSignals) -> ScoredSlot {
    let hour = slot.time.hour();
    let mut score = BASE_SCORE;

    let time_category = TimeCategory::for_hour(hour);
    if let Some(category) = time_category {
        score += category.bonus();
    }

    let day_preference = DayPreference::for_weekday(slot.date.weekday());
    if let Some(day) = day_preference {
        score += day.bonus();
    }

    let mut pattern_match = false;
    if let Some(pattern_score) = signals.pattern_score {
        score += pattern_score;
        pattern_match = pattern_score > 0;
    }

    if signals.has_buffer {
        score += 20;
    }

    score += duration_bonus(duration_minutes);

    let post_lunch = hour == 13;
    if post_lunch {
        score -= 10;
    }

    let has_break_before = duration_minutes >= 60 && signals.has_break_before;
    if has_break_before {
        score += 15;
    }

    let mut reasons = Vec::new();
    if let Some(category) = time_category {
        reasons.push(category.reason());
    }
    if day_preference == Some(DayPreference::Midweek) {
        reasons.push("Best day for focus");
    }
    if signals.has_buffer {
        reasons.push("Good buffer time");
    }
    if pattern_match {
        reasons.push("Matches your preferences");
    }
    if has_break_before {
        reasons.push("Fresh start after break");
    }

    ScoredSlot {
        slot,
        score,
        reason: reasons.first().copied().unwrap_or(FALLBACK_REASON),
        reasons,
        time_category,
        day_preference,
        pattern_match,
        has_buffer: signals.has_buffer,
        post_lunch,
        has_break_before,
    }
}

/// Highest score first, earliest start on ties.
pub fn rank(mut scored: Vec<ScoredSlot>) -> Vec<ScoredSlot> {
    scored.sort_by(|a, b| match b.score.cmp(&a.score) {
        Ordering::Equal => a.slot.start_utc().cmp(&b.slot.start_utc()),
        other => other,
    });
    scored
}

/// Gathers the calendar and history signals for each candidate, then scores and ranks.
pub struct SlotScorer {
    calendar: Arc<dyn CalendarService>,
    calendar_id: String,
    buffer: Duration,
    break_window: Duration,
}

impl SlotScorer {
    pub fn new(
        calendar: Arc<dyn CalendarService>,
        calendar_id: impl Into<String>,
        config: &ScoringConfig,
    ) -> Self {
        Self {
            calendar,
            calendar_id: calendar_id.into(),
            buffer: Duration::minutes(config.buffer_minutes),
            break_window: Duration::minutes(config.break_minutes),
        }
    }

    pub async fn score(
        &self,
        candidates: Vec<CandidateSlot>,
        preferences: &SchedulingPreferences,
        duration_minutes: u32,
        patterns: &dyn PatternSource,
    ) -> Vec<ScoredSlot> {
        let mut scored = Vec::with_capacity(candidates.len());
        for slot in candidates {
            let signals = self
                .signals_for(&slot, duration_minutes, preferences, patterns)
                .await;
            scored.push(score_slot(slot, duration_minutes, signals));
        }
        debug!(count = scored.len(), duration_minutes, "Scored candidate slots");
        rank(scored)
    }

    pub async fn signals_for(
        &self,
        slot: &CandidateSlot,
        duration_minutes: u32,
        preferences: &SchedulingPreferences,
        patterns: &dyn PatternSource,
    ) -> SlotSignals {
        let pattern_score = preferences
            .user_id
            .as_deref()
            .filter(|user| !user.trim().is_empty())
            .map(|user| {
                patterns
                    .pattern_for(user, slot.date.weekday(), slot.time.hour())
                    .map_or(0, |pattern| pattern.score())
            });

        let start = slot.start_utc();
        let end = slot.end_utc();
        let has_buffer = self
            .is_clear(start - self.buffer, end + self.buffer, "buffer")
            .await;

        let has_break_before = if duration_minutes >= 60 {
            self.is_clear(start - self.break_window, start, "break")
                .await
        } else {
            false
        };

        SlotSignals {
            pattern_score,
            has_buffer,
            has_break_before,
        }
    }

    async fn is_clear(&self, from: DateTime<Utc>, to: DateTime<Utc>, check: &str) -> bool {
        match self.calendar.get_busy_times(&self.calendar_id, from, to).await {
            Ok(busy) => busy.is_empty(),
            Err(e) => {
                let context = format!(
                    "Calendar lookup for {} check failed, treating as clear",
                    check
                );
                log_recovered(e, &context);
                true
            }
        }
    }
}
