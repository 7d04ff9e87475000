// --- File: crates/nextdoor_booking/src/auth.rs ---
//! Service-account authentication for the Google Calendar backend.

use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    CalendarHub,
};
use nextdoor_common::{config_error, external_service_error, NextdoorError};
use nextdoor_config::GcalConfig;
use std::path::Path;
use tracing::info;

type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

pub async fn create_calendar_hub(config: &GcalConfig) -> Result<HubType, NextdoorError> {
    let key_path = config
        .key_path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| config_error("gcal.key_path is required when use_gcal is enabled"))?;

    let sa_key = read_service_account_key(Path::new(key_path))
        .await
        .map_err(|e| config_error(format!("Cannot read service account key {}: {}", key_path, e)))?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| external_service_error("Google OAuth", e))?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| config_error(format!("No native TLS roots: {}", e)))?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    info!(calendar_id = %config.calendar_id, "Google Calendar client ready");
    Ok(CalendarHub::new(client, auth))
}
