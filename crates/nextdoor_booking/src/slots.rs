// --- File: crates/nextdoor_booking/src/slots.rs ---
//! The slot grid: turning business hours into an ordered list of bookable start times.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Weekday};
use nextdoor_config::SlotGridSettings;
use serde::Serialize;
use std::str::FromStr;

use crate::error::BookingError;

/// Lunch exclusion, in whole hours. Slots *starting* inside `[start_hour, end_hour)` are skipped,
/// and smart-suggestion candidates may not run into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunchBreak {
    pub start_hour: u32,
    pub end_hour: u32,
}

/// One configuration of the slot generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGridConfig {
    pub start_hour: u32,
    pub end_hour: u32,
    pub slot_minutes: u32,
    pub lunch: Option<LunchBreak>,
    /// `None` means every day of the week is a working day.
    pub working_days: Option<Vec<Weekday>>,
}

impl SlotGridConfig {
    /// Validated grid from its configuration; the presets live on [`SlotGridSettings`].
    pub fn from_settings(settings: &SlotGridSettings) -> Result<Self, BookingError> {
        let working_days = match &settings.working_days {
            Some(names) => Some(
                names
                    .iter()
                    .map(|name| {
                        Weekday::from_str(name).map_err(|_| {
                            BookingError::InvalidRange(format!("unknown working day '{}'", name))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        let config = Self {
            start_hour: settings.start_hour,
            end_hour: settings.end_hour,
            slot_minutes: settings.slot_minutes,
            lunch: settings.lunch.map(|l| LunchBreak {
                start_hour: l.start_hour,
                end_hour: l.end_hour,
            }),
            working_days,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BookingError> {
        if self.end_hour <= self.start_hour {
            return Err(BookingError::InvalidRange(format!(
                "end hour {} must be after start hour {}",
                self.end_hour, self.start_hour
            )));
        }
        if self.end_hour > 24 {
            return Err(BookingError::InvalidRange(format!(
                "end hour {} is past midnight",
                self.end_hour
            )));
        }
        if self.slot_minutes == 0 {
            return Err(BookingError::InvalidRange(
                "slot length must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.working_days
            .as_ref()
            .map_or(true, |days| days.contains(&date.weekday()))
    }

    /// Minutes after midnight at which the business day ends.
    pub fn day_end_minutes(&self) -> u32 {
        self.end_hour * 60
    }

    /// Whether `[start, end)` (minutes after midnight) runs into the lunch exclusion.
    pub fn overlaps_lunch(&self, start_minutes: u32, end_minutes: u32) -> bool {
        self.lunch.is_some_and(|lunch| {
            start_minutes < lunch.end_hour * 60 && end_minutes > lunch.start_hour * 60
        })
    }

    fn in_lunch(&self, minutes: u32) -> bool {
        self.lunch.is_some_and(|lunch| {
            minutes >= lunch.start_hour * 60 && minutes < lunch.end_hour * 60
        })
    }
}

/// A bookable unit of time. Identity is `(date, start_time)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub available: bool,
}

impl TimeSlot {
    pub fn label(&self) -> String {
        hhmm::format(self.start_time)
    }

    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }
}

/// Produces the slot grid for a day. Cheap to clone; holds only the validated config.
#[derive(Debug, Clone)]
pub struct SlotGenerator {
    config: SlotGridConfig,
}

impl SlotGenerator {
    pub fn new(config: SlotGridConfig) -> Result<Self, BookingError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_settings(settings: &SlotGridSettings) -> Result<Self, BookingError> {
        Ok(Self {
            config: SlotGridConfig::from_settings(settings)?,
        })
    }

    pub fn config(&self) -> &SlotGridConfig {
        &self.config
    }

    /// Every slot of the grid for `date`, in order, all marked available.
    ///
    /// Only slots that fit entirely before the end hour are produced. Working days are not
    /// applied here; callers that care ask [`SlotGridConfig::is_working_day`].
    pub fn generate(&self, date: NaiveDate) -> Vec<TimeSlot> {
        let step = self.config.slot_minutes;
        let day_end = self.config.day_end_minutes();

        let mut slots = Vec::new();
        let mut minutes = self.config.start_hour * 60;
        while minutes + step <= day_end {
            if !self.config.in_lunch(minutes) {
                if let Some(start_time) = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0) {
                    slots.push(TimeSlot {
                        date,
                        start_time,
                        duration_minutes: step,
                        available: true,
                    });
                }
            }
            minutes += step;
        }
        slots
    }

    pub fn slot_length(&self) -> Duration {
        Duration::minutes(i64::from(self.config.slot_minutes))
    }
}

/// Builds an ad-hoc grid without a lunch exclusion.
pub fn generate(
    date: NaiveDate,
    start_hour: u32,
    end_hour: u32,
    slot_minutes: u32,
) -> Result<Vec<TimeSlot>, BookingError> {
    let generator = SlotGenerator::new(SlotGridConfig {
        start_hour,
        end_hour,
        slot_minutes,
        lunch: None,
        working_days: None,
    })?;
    Ok(generator.generate(date))
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| BookingError::InvalidDateFormat)
}

/// Parses `HH:MM`.
pub fn parse_time(value: &str) -> Result<NaiveTime, BookingError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| BookingError::InvalidTimeFormat)
}

/// Wall-clock times on the wire are always `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn format(time: NaiveTime) -> String {
        time.format("%H:%M").to_string()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*time))
    }
}
