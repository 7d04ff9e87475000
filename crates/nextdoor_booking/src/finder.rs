// --- File: crates/nextdoor_booking/src/finder.rs ---
//! Next-available search over the basic hourly grid.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::availability::AvailabilityIndex;
use crate::slots::{hhmm, SlotGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NextSlot {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2025-10-20"))]
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "10:00"))]
    pub time: NaiveTime,
}

/// Walks forward day by day over the basic grid looking for the first free slot that starts
/// strictly after `now + lead`.
#[derive(Debug, Clone)]
pub struct NextAvailableFinder {
    generator: SlotGenerator,
    time_zone: Tz,
    lead: Duration,
    horizon_days: u32,
}

impl NextAvailableFinder {
    pub fn new(
        generator: SlotGenerator,
        time_zone: Tz,
        lead_minutes: i64,
        horizon_days: u32,
    ) -> Self {
        Self {
            generator,
            time_zone,
            lead: Duration::minutes(lead_minutes),
            horizon_days,
        }
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// `None` is a normal outcome: the whole horizon is taken.
    pub fn find_next(&self, index: &AvailabilityIndex, now: DateTime<Utc>) -> Option<NextSlot> {
        let earliest = now + self.lead;
        let first_day = earliest.with_timezone(&self.time_zone).date_naive();

        for date in first_day.iter_days().take(self.horizon_days as usize) {
            for slot in self.generator.generate(date) {
                // Wall-clock times skipped by a DST change have no instant and are not bookable.
                let local = date.and_time(slot.start_time);
                let instant = match self.time_zone.from_local_datetime(&local) {
                    LocalResult::Single(t) => t,
                    LocalResult::Ambiguous(first, _) => first,
                    LocalResult::None => continue,
                };
                if instant.with_timezone(&Utc) > earliest
                    && !index.is_booked(date, slot.start_time)
                {
                    debug!(%date, time = %slot.start_time, "Found next available slot");
                    return Some(NextSlot {
                        date,
                        time: slot.start_time,
                    });
                }
            }
        }
        None
    }
}
