// --- File: crates/nextdoor_booking/src/patterns.rs ---
//! Per-customer booking habits, keyed by weekday and hour.

use chrono::Weekday;
use serde::Serialize;
use std::collections::HashMap;

/// Counts for one (customer, weekday, hour) cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPattern {
    pub booking_count: u32,
    pub cancelled_count: u32,
}

impl BookingPattern {
    /// Share of bookings in this cell that were not cancelled. `None` when nothing was booked.
    pub fn success_rate(&self) -> Option<f64> {
        if self.booking_count == 0 {
            return None;
        }
        let kept = self.booking_count.saturating_sub(self.cancelled_count);
        Some(f64::from(kept) / f64::from(self.booking_count))
    }

    /// `round(count * 5 + rate * 10)`. A missing or zero rate counts as 0.5.
    pub fn score(&self) -> i64 {
        let rate = self.success_rate().filter(|r| *r > 0.0).unwrap_or(0.5);
        (f64::from(self.booking_count) * 5.0 + rate * 10.0).round() as i64
    }
}

/// Read access to booking habits, as needed by the slot scorer.
#[cfg_attr(test, mockall::automock)]
pub trait PatternSource: Send + Sync {
    fn pattern_for(&self, user_id: &str, weekday: Weekday, hour: u32) -> Option<BookingPattern>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PatternKey {
    user: String,
    weekday: Weekday,
    hour: u32,
}

impl PatternKey {
    fn new(user: &str, weekday: Weekday, hour: u32) -> Self {
        Self {
            user: user.trim().to_lowercase(),
            weekday,
            hour,
        }
    }
}

#[derive(Debug, Default)]
pub struct BookingPatterns {
    cells: HashMap<PatternKey, BookingPattern>,
}

impl BookingPatterns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_booking(&mut self, user: &str, weekday: Weekday, hour: u32) {
        let cell = self
            .cells
            .entry(PatternKey::new(user, weekday, hour))
            .or_default();
        cell.booking_count += 1;
    }

    pub fn record_cancellation(&mut self, user: &str, weekday: Weekday, hour: u32) {
        if let Some(cell) = self.cells.get_mut(&PatternKey::new(user, weekday, hour)) {
            cell.cancelled_count = (cell.cancelled_count + 1).min(cell.booking_count);
        }
    }

    /// Undoes a `record_booking` for a booking that never took effect.
    pub fn forget_booking(&mut self, user: &str, weekday: Weekday, hour: u32) {
        let key = PatternKey::new(user, weekday, hour);
        if let Some(cell) = self.cells.get_mut(&key) {
            cell.booking_count = cell.booking_count.saturating_sub(1);
            cell.cancelled_count = cell.cancelled_count.min(cell.booking_count);
            if cell.booking_count == 0 {
                self.cells.remove(&key);
            }
        }
    }
}

impl PatternSource for BookingPatterns {
    fn pattern_for(&self, user_id: &str, weekday: Weekday, hour: u32) -> Option<BookingPattern> {
        self.cells
            .get(&PatternKey::new(user_id, weekday, hour))
            .copied()
    }
}
