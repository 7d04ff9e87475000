// --- File: crates/nextdoor_booking/src/store.rs ---
//! The single owner of all scheduling state.
//!
//! Ledger, availability index and pattern history share one mutex, so "check the slot, then
//! mark it" happens under a single lock acquisition. Nothing here awaits: calendar calls are
//! made by the caller before or after, never while the lock is held.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::availability::AvailabilityIndex;
use crate::error::BookingError;
use crate::ledger::{Booking, BookingLedger, NewBooking};
use crate::patterns::{BookingPattern, BookingPatterns, PatternSource};
use crate::slots::TimeSlot;

#[derive(Debug)]
struct StoreInner {
    ledger: BookingLedger,
    index: AvailabilityIndex,
    patterns: BookingPatterns,
}

#[derive(Debug)]
pub struct SchedulingStore {
    inner: Mutex<StoreInner>,
}

impl SchedulingStore {
    pub fn new(default_service: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                ledger: BookingLedger::new(default_service),
                index: AvailabilityIndex::new(),
                patterns: BookingPatterns::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Scheduling store lock was poisoned; continuing with its last state");
            poisoned.into_inner()
        })
    }

    pub fn create_booking(
        &self,
        fields: &NewBooking,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let booking = inner.ledger.create(fields, &mut inner.index, today, now)?;
        inner.patterns.record_booking(
            &booking.customer_key(),
            booking.date.weekday(),
            booking.time.hour(),
        );
        Ok(booking)
    }

    pub fn get_booking(&self, id: u64) -> Result<Booking, BookingError> {
        self.lock().ledger.get(id).cloned()
    }

    pub fn cancel_booking(&self, id: u64) -> Result<Booking, BookingError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let (booking, changed) = inner.ledger.cancel(id)?;
        if changed {
            inner.patterns.record_cancellation(
                &booking.customer_key(),
                booking.date.weekday(),
                booking.time.hour(),
            );
        }
        Ok(booking)
    }

    /// Frees the slot of a cancelled booking. Confirmed bookings keep their slot.
    pub fn release_booking_slot(&self, id: u64) -> Result<bool, BookingError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let booking = inner.ledger.get(id)?;
        if booking.is_confirmed() {
            return Err(BookingError::invalid_request(
                "Only cancelled bookings can release their slot",
            ));
        }
        let (date, time) = (booking.date, booking.time);
        let released = inner.index.release_booking(date, time);
        info!(id, %date, %time, released, "Released booking slot");
        Ok(released)
    }

    /// Undoes a booking whose calendar event could not be written: cancelled, slot freed,
    /// and not counted in the customer's history.
    pub fn roll_back_booking(&self, id: u64) -> Result<Booking, BookingError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let (booking, _) = inner.ledger.cancel(id)?;
        inner.index.release_booking(booking.date, booking.time);
        inner.patterns.forget_booking(
            &booking.customer_key(),
            booking.date.weekday(),
            booking.time.hour(),
        );
        warn!(id, "Rolled back booking");
        Ok(booking)
    }

    pub fn attach_event(&self, id: u64, event_id: String) -> Result<(), BookingError> {
        self.lock().ledger.attach_event(id, event_id)
    }

    pub fn block(&self, date: NaiveDate, times: &[NaiveTime], reason: Option<&str>) -> usize {
        self.lock().index.block(date, times, reason)
    }

    pub fn is_booked(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.lock().index.is_booked(date, time)
    }

    pub fn annotate(&self, date: NaiveDate, slots: Vec<TimeSlot>) -> Vec<TimeSlot> {
        self.lock().index.annotate(date, slots)
    }

    /// Runs `f` against the index under the lock. `f` must not block.
    pub fn with_index<R>(&self, f: impl FnOnce(&AvailabilityIndex) -> R) -> R {
        f(&self.lock().index)
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.lock().ledger.iter().cloned().collect()
    }
}

impl PatternSource for SchedulingStore {
    fn pattern_for(&self, user_id: &str, weekday: Weekday, hour: u32) -> Option<BookingPattern> {
        self.lock().patterns.pattern_for(user_id, weekday, hour)
    }
}
