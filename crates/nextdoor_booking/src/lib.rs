// --- File: crates/nextdoor_booking/src/lib.rs ---
pub mod assistant;
#[cfg(feature = "gcal")]
pub mod auth;
#[cfg(all(test, feature = "gcal"))]
mod auth_test;
pub mod availability;
pub mod doc;
pub mod error;
pub mod finder;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod ledger;
#[cfg(test)]
mod ledger_test;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod patterns;
pub mod retry;
pub mod routes;
pub mod scoring;
#[cfg(test)]
mod scoring_test;
pub mod service;
pub mod slots;
pub mod store;

pub use error::BookingError;
pub use handlers::BookingState;
pub use ledger::{Booking, BookingStatus, NewBooking};
pub use retry::{ResilientCalendar, RetryPolicy};
pub use routes::routes;
pub use service::InMemoryCalendarService;
