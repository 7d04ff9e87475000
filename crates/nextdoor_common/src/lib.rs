// --- File: crates/nextdoor_common/src/lib.rs ---

// Declare modules within this crate
pub mod clock; // Time source abstraction
pub mod error; // Error handling
pub mod http; // HTTP error responses
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, external_service_error, not_found, timeout_error, validation_error,
    Context, HttpStatusCode, NextdoorError,
};

pub use http::IntoHttpResponse;

pub use logging::{init_from_config, init_with_level, log_error, log_recovered};

pub use clock::{Clock, FixedClock, SystemClock};
