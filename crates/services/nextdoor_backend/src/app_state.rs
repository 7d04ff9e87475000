// --- File: crates/services/nextdoor_backend/src/app_state.rs ---
use nextdoor_booking::BookingState;
use nextdoor_common::{Clock, NextdoorError, SystemClock};
use nextdoor_config::AppConfig;
use std::sync::Arc;
use std::time::Instant;

use crate::service_factory::NextdoorServiceFactory;

/// Application state shared by the backend's own routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub booking: Arc<BookingState>,
    pub clock: Arc<dyn Clock>,
    pub started_at: Instant,
}

impl AppState {
    /// Wires the booking state to the services chosen by `config`.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, NextdoorError> {
        let factory = NextdoorServiceFactory::new(&config).await?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let booking = BookingState::new(config.clone(), factory.calendar_service(), clock.clone())?;

        Ok(Self {
            config,
            booking: Arc::new(booking),
            clock,
            started_at: Instant::now(),
        })
    }

    pub fn environment(&self) -> String {
        self.config
            .server
            .environment
            .clone()
            .unwrap_or_else(|| "development".to_string())
    }
}
