// --- File: crates/nextdoor_booking/src/handlers.rs ---
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::{Datelike, Duration, NaiveDate, SecondsFormat, Utc};
use chrono_tz::Tz;
use nextdoor_common::services::{CalendarEvent, CalendarService};
use nextdoor_common::{config_error, Clock, NextdoorError};
use nextdoor_config::AppConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::assistant;
use crate::error::{BookingError, PAST_AVAILABILITY};
use crate::finder::{NextAvailableFinder, NextSlot};
use crate::ledger::{Booking, NewBooking};
use crate::logic::{
    local_instant, resolve_time_zone, DayTopSlot, SmartScheduler, SmartSuggestions,
    DEFAULT_DURATION_MINUTES, MAX_DURATION_MINUTES,
};
use crate::scoring::{SchedulingPreferences, SlotScorer};
use crate::slots::{hhmm, parse_date, parse_time, SlotGenerator, TimeSlot};
use crate::store::SchedulingStore;

pub const ADMIN_TOKEN_HEADER: &str = "admintoken";
const DEFAULT_CALENDAR_ID: &str = "primary";

/// Shared state for every booking route.
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub store: Arc<SchedulingStore>,
    pub calendar: Arc<dyn CalendarService>,
    pub clock: Arc<dyn Clock>,
    pub time_zone: Tz,
    pub basic_grid: SlotGenerator,
    pub finder: NextAvailableFinder,
    pub scheduler: SmartScheduler,
}

impl BookingState {
    pub fn new(
        config: Arc<AppConfig>,
        calendar: Arc<dyn CalendarService>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, NextdoorError> {
        let time_zone = Tz::from_str(&config.business.time_zone).map_err(|_| {
            config_error(format!("Unknown business time zone: {}", config.business.time_zone))
        })?;

        let basic_grid = SlotGenerator::from_settings(&config.basic_grid)?;
        let calendar_grid = SlotGenerator::from_settings(&config.calendar_grid)?;

        let store = Arc::new(SchedulingStore::new(config.business.default_service.clone()));
        let calendar_id = config
            .gcal
            .as_ref()
            .map(|g| g.calendar_id.clone())
            .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string());

        let finder = NextAvailableFinder::new(
            basic_grid.clone(),
            time_zone,
            config.next_available.lead_minutes,
            config.next_available.horizon_days,
        );
        let scorer = SlotScorer::new(calendar.clone(), calendar_id.clone(), &config.scoring);
        let scheduler = SmartScheduler::new(
            store.clone(),
            calendar.clone(),
            calendar_id,
            calendar_grid,
            time_zone,
            scorer,
            config.scoring.suggestion_count,
        );

        Ok(Self {
            config,
            store,
            calendar,
            clock,
            time_zone,
            basic_grid,
            finder,
            scheduler,
        })
    }

    /// Current date in the business time zone.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.time_zone).date_naive()
    }

    fn calendar_id(&self) -> &str {
        self.config
            .gcal
            .as_ref()
            .map(|g| g.calendar_id.as_str())
            .unwrap_or(DEFAULT_CALENDAR_ID)
    }

    fn sync_bookings(&self) -> bool {
        self.config.use_gcal && self.config.gcal.as_ref().is_some_and(|g| g.sync_bookings)
    }

    fn day_availability(&self, date: NaiveDate) -> Vec<SlotStatus> {
        self.store
            .annotate(date, self.basic_grid.generate(date))
            .iter()
            .map(SlotStatus::from)
            .collect()
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, BookingError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| BookingError::invalid_request(rejection.body_text()))
}

fn require_query<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, BookingError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            BookingError::invalid_request(format!("Missing required query parameter: {}", name))
        })
}

/// Ids that are not positive integers cannot name a booking.
fn parse_booking_id(raw: &str) -> Result<u64, BookingError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| BookingError::booking_not_found())
}

fn require_admin(state: &BookingState, headers: &HeaderMap) -> Result<(), BookingError> {
    let presented = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(BookingError::Unauthorized("Unauthorized"))?;

    match state.config.admin.token.as_deref() {
        Some(expected) if expected != presented => {
            warn!("Rejected admin request with a wrong token");
            Err(BookingError::Unauthorized("Unauthorized"))
        }
        _ => Ok(()),
    }
}

// --- Availability ---

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams), into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Day to check, `YYYY-MM-DD`.
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotStatus {
    #[cfg_attr(feature = "openapi", schema(example = "10:00"))]
    pub time: String,
    pub available: bool,
}

impl From<&TimeSlot> for SlotStatus {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            time: slot.label(),
            available: slot.available,
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DayAvailabilityResponse {
    pub success: bool,
    pub date: String,
    pub available_slots: Vec<SlotStatus>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Hourly slots for the day", body = DayAvailabilityResponse),
        (status = 400, description = "Missing, malformed or past date")
    ),
    tag = "Availability"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<DayAvailabilityResponse>, BookingError> {
    let raw = require_query(&query.date, "date")?;
    let date = parse_date(raw)?;
    if date < state.today() {
        return Err(BookingError::PastDate(PAST_AVAILABILITY));
    }

    Ok(Json(DayAvailabilityResponse {
        success: true,
        date: date.to_string(),
        available_slots: state.day_availability(date),
    }))
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams), into_params(parameter_in = Query))]
#[serde(rename_all = "camelCase")]
pub struct WeekQuery {
    pub start_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct WeekAvailabilityResponse {
    pub success: bool,
    pub week_availability: BTreeMap<String, Vec<SlotStatus>>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability/week",
    params(WeekQuery),
    responses(
        (
            status = 200,
            description = "Seven consecutive days of hourly slots",
            body = WeekAvailabilityResponse
        ),
        (status = 400, description = "Missing or malformed startDate")
    ),
    tag = "Availability"
))]
pub async fn get_week_availability_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekAvailabilityResponse>, BookingError> {
    let start = parse_date(require_query(&query.start_date, "startDate")?)?;

    let week_availability = start
        .iter_days()
        .take(7)
        .map(|date| (date.to_string(), state.day_availability(date)))
        .collect();

    Ok(Json(WeekAvailabilityResponse {
        success: true,
        week_availability,
    }))
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NextAvailableResponse {
    pub success: bool,
    pub next_slot: Option<NextSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability/next-available",
    responses(
        (
            status = 200,
            description = "First free slot after the lead time, or null",
            body = NextAvailableResponse
        )
    ),
    tag = "Availability"
))]
pub async fn get_next_available_handler(
    State(state): State<Arc<BookingState>>,
) -> Json<NextAvailableResponse> {
    let now = state.clock.now();
    let next_slot = state
        .store
        .with_index(|index| state.finder.find_next(index, now));

    let message = next_slot.is_none().then(|| {
        format!(
            "No available slots in the next {} days",
            state.finder.horizon_days()
        )
    });

    Json(NextAvailableResponse {
        success: true,
        next_slot,
        message,
    })
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BlockResponse {
    pub success: bool,
    pub blocked_slots: Vec<String>,
    pub date: String,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BlockRequest {
    #[cfg_attr(feature = "openapi", schema(example = "2025-10-20"))]
    pub date: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = json!(["10:00", "11:00"])))]
    pub times: Option<Vec<String>>,
    /// Only has to be present.
    pub admin_token: Option<String>,
    pub reason: Option<String>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/availability/block",
    request_body = BlockRequest,
    responses(
        (status = 200, description = "Slots blocked", body = BlockResponse),
        (status = 400, description = "Date or times malformed"),
        (status = 401, description = "adminToken missing")
    ),
    tag = "Admin"
))]
pub async fn block_slots_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BlockResponse>, BookingError> {
    let body = json_body(payload)?;

    // The token is checked before the shape of the rest of the body.
    let has_token = body
        .get("adminToken")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.trim().is_empty());
    if !has_token {
        return Err(BookingError::Unauthorized("Admin authorization required"));
    }

    let required = || BookingError::invalid_request("Date and times array are required");
    let request: BlockRequest = serde_json::from_value(body).map_err(|_| required())?;
    let (Some(raw_date), Some(raw_times)) = (request.date, request.times) else {
        return Err(required());
    };

    let date = parse_date(&raw_date)?;
    let times = raw_times
        .iter()
        .map(|t| parse_time(t))
        .collect::<Result<Vec<_>, _>>()?;

    let newly_blocked = state.store.block(date, &times, request.reason.as_deref());
    info!(%date, requested = times.len(), newly_blocked, "Blocked slots");

    Ok(Json(BlockResponse {
        success: true,
        blocked_slots: times.into_iter().map(hhmm::format).collect(),
        date: date.to_string(),
    }))
}

// --- Bookings ---

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub booking: Booking,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Writes the booking to the calendar. The caller rolls the booking back on failure.
async fn push_calendar_event(state: &BookingState, booking: &Booking) -> Result<(), BookingError> {
    let start = local_instant(state.time_zone, booking.date, booking.time)
        .ok_or_else(|| {
            BookingError::invalid_request(format!(
                "{} {} does not exist in {}",
                booking.date,
                hhmm::format(booking.time),
                state.time_zone
            ))
        })?
        .with_timezone(&Utc);
    let end = start + state.basic_grid.slot_length();

    let event = CalendarEvent {
        start_time: start.to_rfc3339(),
        end_time: end.to_rfc3339(),
        summary: format!("{} - {}", booking.service, booking.name),
        description: Some(format!("Phone: {}\n{}", booking.phone, booking.notes)),
        attendee_email: Some(booking.email.clone()),
    };

    let result = state.calendar.create_event(state.calendar_id(), event).await?;
    if let Some(event_id) = result.event_id {
        state.store.attach_event(booking.id, event_id)?;
    }
    Ok(())
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings",
    request_body(content = NewBooking, example = json!({
        "name": "Test User",
        "email": "test@example.com",
        "phone": "555-0123",
        "date": "2025-10-20",
        "time": "10:00"
    })),
    responses(
        (status = 201, description = "Booking confirmed", body = BookingResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Slot no longer available"),
        (status = 500, description = "Calendar provider failed"),
        (status = 504, description = "Calendar provider timed out")
    ),
    tag = "Bookings"
))]
pub async fn create_booking_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>), BookingError> {
    let fields = json_body(payload)?;
    let booking = state
        .store
        .create_booking(&fields, state.today(), state.clock.now())?;

    let booking = if state.sync_bookings() {
        if let Err(e) = push_calendar_event(&state, &booking).await {
            error!(id = booking.id, "Calendar sync failed, rolling back booking: {}", e);
            state.store.roll_back_booking(booking.id)?;
            return Err(e);
        }
        state.store.get_booking(booking.id)?
    } else {
        booking
    };

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            success: true,
            booking,
        }),
    ))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/bookings/{id}",
    params(("id" = u64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "The booking", body = BookingResponse),
        (status = 404, description = "Booking not found")
    ),
    tag = "Bookings"
))]
pub async fn get_booking_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, BookingError> {
    let booking = state.store.get_booking(parse_booking_id(&id)?)?;
    Ok(Json(BookingResponse {
        success: true,
        booking,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/bookings/{id}",
    params(("id" = u64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking cancelled", body = MessageResponse),
        (status = 404, description = "Booking not found"),
        (status = 500, description = "Calendar provider failed"),
        (status = 504, description = "Calendar provider timed out")
    ),
    tag = "Bookings"
))]
pub async fn cancel_booking_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, BookingError> {
    let id = parse_booking_id(&id)?;

    if state.sync_bookings() {
        let booking = state.store.get_booking(id)?;
        let event_id = booking.calendar_event_id.as_deref();
        if let (true, Some(event_id)) = (booking.is_confirmed(), event_id) {
            state
                .calendar
                .mark_event_cancelled(state.calendar_id(), event_id, true)
                .await?;
        }
    }

    let booking = state.store.cancel_booking(id)?;
    info!(id = booking.id, "Booking cancelled");

    Ok(Json(MessageResponse {
        success: true,
        message: "Booking cancelled successfully".to_string(),
    }))
}

// --- Admin ---

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingListResponse {
    pub success: bool,
    pub bookings: Vec<Booking>,
    pub total: usize,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total_bookings: usize,
    pub today_bookings: usize,
    pub week_bookings: usize,
    pub month_bookings: usize,
}

impl BookingStats {
    /// Counts confirmed bookings by appointment date. The week is `today` plus the next six days.
    pub fn collect(bookings: &[Booking], today: NaiveDate) -> Self {
        let week_end = today + Duration::days(7);
        bookings
            .iter()
            .filter(|b| b.is_confirmed())
            .fold(Self::default(), |mut stats, b| {
                stats.total_bookings += 1;
                if b.date == today {
                    stats.today_bookings += 1;
                }
                if b.date >= today && b.date < week_end {
                    stats.week_bookings += 1;
                }
                if b.date.year() == today.year() && b.date.month() == today.month() {
                    stats.month_bookings += 1;
                }
                stats
            })
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatsResponse {
    pub success: bool,
    pub stats: BookingStats,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/bookings",
    responses(
        (
            status = 200,
            description = "Every booking, cancelled ones included",
            body = BookingListResponse
        ),
        (status = 401, description = "Missing or wrong admintoken header")
    ),
    tag = "Admin"
))]
pub async fn list_bookings_handler(
    State(state): State<Arc<BookingState>>,
    headers: HeaderMap,
) -> Result<Json<BookingListResponse>, BookingError> {
    require_admin(&state, &headers)?;
    let bookings = state.store.bookings();
    Ok(Json(BookingListResponse {
        success: true,
        total: bookings.len(),
        bookings,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Confirmed booking counts", body = StatsResponse),
        (status = 401, description = "Missing or wrong admintoken header")
    ),
    tag = "Admin"
))]
pub async fn booking_stats_handler(
    State(state): State<Arc<BookingState>>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, BookingError> {
    require_admin(&state, &headers)?;
    Ok(Json(StatsResponse {
        success: true,
        stats: BookingStats::collect(&state.store.bookings(), state.today()),
    }))
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReleaseResponse {
    pub success: bool,
    pub booking_id: u64,
    pub released: bool,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/bookings/{id}/release",
    params(("id" = u64, Path, description = "Cancelled booking whose slot should be freed")),
    responses(
        (status = 200, description = "Whether the slot was freed", body = ReleaseResponse),
        (status = 400, description = "Booking is still confirmed"),
        (status = 401, description = "Missing or wrong admintoken header"),
        (status = 404, description = "Booking not found")
    ),
    tag = "Admin"
))]
pub async fn release_slot_handler(
    State(state): State<Arc<BookingState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ReleaseResponse>, BookingError> {
    require_admin(&state, &headers)?;
    let booking_id = parse_booking_id(&id)?;
    let released = state.store.release_booking_slot(booking_id)?;
    Ok(Json(ReleaseResponse {
        success: true,
        booking_id,
        released,
    }))
}

// --- Smart suggestions ---

#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SmartSuggestionRequest {
    #[cfg_attr(feature = "openapi", schema(example = "2025-10-21"))]
    pub date: Option<String>,
    /// Minutes, 1 to 1440; defaults to 30.
    pub duration: Option<i64>,
    pub preferences: Option<SchedulingPreferences>,
    /// IANA zone for rendering `startTime`/`endTime`.
    pub timezone: Option<String>,
}

fn duration_minutes(requested: Option<i64>) -> Result<u32, BookingError> {
    match requested {
        None => Ok(DEFAULT_DURATION_MINUTES),
        Some(minutes) => u32::try_from(minutes)
            .ok()
            .filter(|m| (1..=MAX_DURATION_MINUTES).contains(m))
            .ok_or_else(|| {
                BookingError::invalid_request(format!(
                    "Duration must be between 1 and {} minutes",
                    MAX_DURATION_MINUTES
                ))
            }),
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/smart-suggestions",
    request_body = SmartSuggestionRequest,
    responses(
        (
            status = 200,
            description = "Ranked suggestions and every free candidate",
            body = SmartSuggestions
        ),
        (status = 400, description = "Bad date, duration or preferences"),
        (status = 500, description = "Calendar provider failed"),
        (status = 504, description = "Calendar provider timed out")
    ),
    tag = "Smart Scheduling"
))]
pub async fn smart_suggestions_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<SmartSuggestionRequest>, JsonRejection>,
) -> Result<Json<SmartSuggestions>, BookingError> {
    let request = json_body(payload)?;
    let date = match request.date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => parse_date(raw)?,
        _ => return Err(BookingError::MissingField { field: "date" }),
    };
    let duration = duration_minutes(request.duration)?;
    let preferences = request.preferences.unwrap_or_default();
    let display_zone = resolve_time_zone(request.timezone.as_deref(), state.time_zone);

    let suggestions = state
        .scheduler
        .suggestions(date, duration, &preferences, state.clock.now(), display_zone)
        .await?;
    Ok(Json(suggestions))
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams), into_params(parameter_in = Query))]
#[serde(rename_all = "camelCase")]
pub struct WeekSuggestionQuery {
    pub start_date: Option<String>,
    /// Defaults to six days after `startDate`.
    pub end_date: Option<String>,
    pub duration: Option<i64>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct WeekSuggestionsResponse {
    pub success: bool,
    pub optimal_slots: Vec<DayTopSlot>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/smart-suggestions/week",
    params(WeekSuggestionQuery),
    responses(
        (status = 200, description = "Best slot per day", body = WeekSuggestionsResponse),
        (status = 400, description = "Bad dates or duration"),
        (status = 500, description = "Calendar provider failed"),
        (status = 504, description = "Calendar provider timed out")
    ),
    tag = "Smart Scheduling"
))]
pub async fn week_suggestions_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<WeekSuggestionQuery>,
) -> Result<Json<WeekSuggestionsResponse>, BookingError> {
    let start = parse_date(require_query(&query.start_date, "startDate")?)?;
    let end = match query.end_date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => parse_date(raw)?,
        _ => start + Duration::days(6),
    };
    let duration = duration_minutes(query.duration)?;

    let optimal_slots = state
        .scheduler
        .week_optimal_slots(start, end, duration, state.clock.now())
        .await?;
    Ok(Json(WeekSuggestionsResponse {
        success: true,
        optimal_slots,
    }))
}

// --- Assistant ---

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub timestamp: String,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/assistant/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Canned reply", body = ChatResponse),
        (status = 400, description = "Message is required")
    ),
    tag = "Assistant"
))]
pub async fn assistant_chat_handler(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, BookingError> {
    let request = json_body(payload)?;
    let message = request
        .message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| BookingError::invalid_request("Message is required"))?;

    Ok(Json(ChatResponse {
        success: true,
        response: assistant::reply(message).to_string(),
        timestamp: state.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
