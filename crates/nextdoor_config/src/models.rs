// --- File: crates/nextdoor_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Reported by the health endpoint (e.g. "development", "production").
    #[serde(default)]
    pub environment: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: None,
        }
    }
}

// --- Business Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BusinessConfig {
    /// IANA zone all wall-clock slot times are interpreted in.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Service recorded on bookings that do not name one.
    #[serde(default = "default_service")]
    pub default_service: String,
}

fn default_time_zone() -> String {
    "America/Edmonton".to_string()
}

fn default_service() -> String {
    "House Cleaning".to_string()
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            default_service: default_service(),
        }
    }
}

// --- Slot Grid Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct LunchBreakConfig {
    pub start_hour: u32,
    pub end_hour: u32,
}

/// One configuration of the slot generator. The service uses two of them: the basic
/// hourly grid behind the availability endpoints and the calendar grid behind smart
/// suggestions.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SlotGridSettings {
    pub start_hour: u32,
    pub end_hour: u32,
    pub slot_minutes: u32,
    #[serde(default)]
    pub lunch: Option<LunchBreakConfig>,
    /// Day abbreviations ("Mon", "Tue", ...). `None` means every day.
    #[serde(default)]
    pub working_days: Option<Vec<String>>,
}

impl SlotGridSettings {
    /// 08:00-18:00, one slot per hour, no lunch exclusion.
    pub fn basic_hourly() -> Self {
        Self {
            start_hour: 8,
            end_hour: 18,
            slot_minutes: 60,
            lunch: None,
            working_days: None,
        }
    }

    /// 09:00-17:00 in 30 minute slots, 12:00-13:00 excluded, weekdays only.
    pub fn calendar_integrated() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
            slot_minutes: 30,
            lunch: Some(LunchBreakConfig {
                start_hour: 12,
                end_hour: 13,
            }),
            working_days: Some(
                ["Mon", "Tue", "Wed", "Thu", "Fri"]
                    .iter()
                    .map(|d| d.to_string())
                    .collect(),
            ),
        }
    }
}

fn default_basic_grid() -> SlotGridSettings {
    SlotGridSettings::basic_hourly()
}

fn default_calendar_grid() -> SlotGridSettings {
    SlotGridSettings::calendar_integrated()
}

// --- Next Available Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NextAvailableConfig {
    #[serde(default = "default_lead_minutes")]
    pub lead_minutes: i64,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
}

fn default_lead_minutes() -> i64 {
    120
}

fn default_horizon_days() -> u32 {
    30
}

impl Default for NextAvailableConfig {
    fn default() -> Self {
        Self {
            lead_minutes: default_lead_minutes(),
            horizon_days: default_horizon_days(),
        }
    }
}

// --- Smart Scheduling Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScoringConfig {
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: i64,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: i64,
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: usize,
}

fn default_buffer_minutes() -> i64 {
    15
}

fn default_break_minutes() -> i64 {
    30
}

fn default_suggestion_count() -> usize {
    3
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            buffer_minutes: default_buffer_minutes(),
            break_minutes: default_break_minutes(),
            suggestion_count: default_suggestion_count(),
        }
    }
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    /// Path to the service account key; the key itself is never part of the config.
    pub key_path: Option<String>,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: usize,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    /// Push created/cancelled bookings to the calendar.
    #[serde(default)]
    pub sync_bookings: bool,
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_retry_attempts() -> usize {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    200
}

impl Default for GcalConfig {
    fn default() -> Self {
        Self {
            key_path: None,
            calendar_id: default_calendar_id(),
            request_timeout_ms: default_request_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            sync_bookings: false,
        }
    }
}

// --- Admin Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AdminConfig {
    /// When set, the `/admin` routes compare the `admintoken` header against it.
    pub token: Option<String>,
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Directory for a daily rolling log file in addition to stdout.
    #[serde(default)]
    pub file_dir: Option<String>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file_dir: None,
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub business: BusinessConfig,
    #[serde(default = "default_basic_grid")]
    pub basic_grid: SlotGridSettings,
    #[serde(default = "default_calendar_grid")]
    pub calendar_grid: SlotGridSettings,
    #[serde(default)]
    pub next_available: NextAvailableConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,

    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            business: BusinessConfig::default(),
            basic_grid: default_basic_grid(),
            calendar_grid: default_calendar_grid(),
            next_available: NextAvailableConfig::default(),
            scoring: ScoringConfig::default(),
            use_gcal: false,
            gcal: None,
            admin: AdminConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
