// --- File: crates/services/nextdoor_backend/src/service_factory.rs ---
//! Builds the external services the booking routes depend on.

use nextdoor_booking::InMemoryCalendarService;
use nextdoor_common::services::CalendarService;
use nextdoor_common::NextdoorError;
use nextdoor_config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "gcal")]
use nextdoor_booking::{
    auth::create_calendar_hub, service::GoogleCalendarService, ResilientCalendar,
};

/// Owns the service instances chosen from configuration and compiled features.
pub struct NextdoorServiceFactory {
    calendar_service: Arc<dyn CalendarService>,
}

impl NextdoorServiceFactory {
    pub async fn new(config: &AppConfig) -> Result<Self, NextdoorError> {
        Ok(Self {
            calendar_service: calendar_service(config).await?,
        })
    }

    pub fn calendar_service(&self) -> Arc<dyn CalendarService> {
        self.calendar_service.clone()
    }
}

#[cfg(feature = "gcal")]
async fn calendar_service(config: &AppConfig) -> Result<Arc<dyn CalendarService>, NextdoorError> {
    match config.gcal.as_ref() {
        Some(gcal) if config.use_gcal => {
            info!("Initializing Google Calendar service...");
            let hub = create_calendar_hub(gcal).await?;
            let google: Arc<dyn CalendarService> =
                Arc::new(GoogleCalendarService::new(Arc::new(hub)));
            Ok(Arc::new(ResilientCalendar::from_config(google, gcal)))
        }
        _ => Ok(in_memory(config)),
    }
}

#[cfg(not(feature = "gcal"))]
async fn calendar_service(config: &AppConfig) -> Result<Arc<dyn CalendarService>, NextdoorError> {
    Ok(in_memory(config))
}

fn in_memory(config: &AppConfig) -> Arc<dyn CalendarService> {
    if config.use_gcal {
        warn!(
            "use_gcal is set but Google Calendar is unavailable in this build; \
             using the in-memory calendar"
        );
    } else {
        info!("Using the in-memory calendar");
    }
    Arc::new(InMemoryCalendarService::new())
}
