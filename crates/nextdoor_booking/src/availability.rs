// --- File: crates/nextdoor_booking/src/availability.rs ---
//! Booked and blocked start times, per date.
//!
//! At query time a customer booking and an admin block look the same: the slot is taken.
//! The stored [`IntervalSource`] matters only when a booking's slot is released, which must
//! never free an admin block.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::slots::TimeSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntervalSource {
    Booking,
    AdminBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedInterval {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub reason: Option<String>,
    pub source: IntervalSource,
}

#[derive(Debug, Default)]
pub struct AvailabilityIndex {
    entries: BTreeMap<NaiveDate, BTreeMap<NaiveTime, BookedInterval>>,
}

impl AvailabilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_booked(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.entries
            .get(&date)
            .is_some_and(|day| day.contains_key(&time))
    }

    /// Whether any booked or blocked start time falls in `[from, until)`, `until` given in
    /// minutes after midnight so the range can reach the end of the day.
    pub fn any_taken_between(
        &self,
        date: NaiveDate,
        from: NaiveTime,
        until_minutes: u32,
    ) -> bool {
        self.entries.get(&date).is_some_and(|day| {
            day.range(from..)
                .next()
                .is_some_and(|(time, _)| time.num_seconds_from_midnight() / 60 < until_minutes)
        })
    }

    /// Marks a slot taken by a booking. Returns `false` if it was already taken, in which
    /// case the existing entry (booking or block) is left untouched.
    pub fn mark_booked(&mut self, date: NaiveDate, time: NaiveTime) -> bool {
        let day = self.entries.entry(date).or_default();
        if day.contains_key(&time) {
            return false;
        }
        day.insert(
            time,
            BookedInterval {
                date,
                start_time: time,
                reason: None,
                source: IntervalSource::Booking,
            },
        );
        true
    }

    /// Admin block. A time that is already booked is re-tagged as blocked so that releasing
    /// the booking later leaves it unavailable. Returns how many times were newly taken.
    pub fn block(&mut self, date: NaiveDate, times: &[NaiveTime], reason: Option<&str>) -> usize {
        let day = self.entries.entry(date).or_default();
        let mut newly_taken = 0;
        for &time in times {
            let previous = day.insert(
                time,
                BookedInterval {
                    date,
                    start_time: time,
                    reason: reason.map(str::to_string),
                    source: IntervalSource::AdminBlock,
                },
            );
            if previous.is_none() {
                newly_taken += 1;
            }
        }
        debug!(%date, requested = times.len(), newly_taken, "Blocked slots");
        newly_taken
    }

    /// Frees a booking-sourced entry. Admin blocks are never removed here.
    pub fn release_booking(&mut self, date: NaiveDate, time: NaiveTime) -> bool {
        let Some(day) = self.entries.get_mut(&date) else {
            return false;
        };
        let is_booking = day
            .get(&time)
            .is_some_and(|interval| interval.source == IntervalSource::Booking);
        if !is_booking {
            return false;
        }
        day.remove(&time);
        if day.is_empty() {
            self.entries.remove(&date);
        }
        true
    }

    /// Flips `available` off for every slot whose start time is taken on `date`.
    pub fn annotate(&self, date: NaiveDate, slots: Vec<TimeSlot>) -> Vec<TimeSlot> {
        let Some(day) = self.entries.get(&date) else {
            return slots;
        };
        slots
            .into_iter()
            .map(|mut slot| {
                if day.contains_key(&slot.start_time) {
                    slot.available = false;
                }
                slot
            })
            .collect()
    }

    pub fn interval(&self, date: NaiveDate, time: NaiveTime) -> Option<&BookedInterval> {
        self.entries.get(&date).and_then(|day| day.get(&time))
    }
}
