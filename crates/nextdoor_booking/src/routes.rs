// --- File: crates/nextdoor_booking/src/routes.rs ---

use crate::handlers::{
    assistant_chat_handler, block_slots_handler, booking_stats_handler, cancel_booking_handler,
    create_booking_handler, get_availability_handler, get_booking_handler,
    get_next_available_handler, get_week_availability_handler, list_bookings_handler,
    release_slot_handler, smart_suggestions_handler, week_suggestions_handler, BookingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Every booking route, relative to the `/api` prefix the backend nests them under.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/availability", get(get_availability_handler))
        .route("/availability/week", get(get_week_availability_handler))
        .route(
            "/availability/next-available",
            get(get_next_available_handler),
        )
        .route("/availability/block", post(block_slots_handler))
        .route("/bookings", post(create_booking_handler))
        .route(
            "/bookings/{id}",
            get(get_booking_handler).delete(cancel_booking_handler),
        )
        .route("/smart-suggestions", post(smart_suggestions_handler))
        .route("/smart-suggestions/week", get(week_suggestions_handler))
        .route("/assistant/chat", post(assistant_chat_handler))
        .route("/admin/bookings", get(list_bookings_handler))
        .route("/admin/stats", get(booking_stats_handler))
        .route("/admin/bookings/{id}/release", post(release_slot_handler))
        .with_state(state)
}
