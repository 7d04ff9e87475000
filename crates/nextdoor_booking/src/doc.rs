// File: crates/nextdoor_booking/src/doc.rs
#![cfg(feature = "openapi")]

use utoipa::OpenApi;

use crate::finder::NextSlot;
use crate::handlers::{
    BlockRequest, BlockResponse, BookingListResponse, BookingResponse, BookingStats, ChatRequest,
    ChatResponse, DayAvailabilityResponse, MessageResponse, NextAvailableResponse,
    ReleaseResponse, SlotStatus, SmartSuggestionRequest, StatsResponse, WeekAvailabilityResponse,
    WeekSuggestionsResponse,
};
use crate::ledger::{Booking, BookingStatus, NewBooking};
use crate::logic::{DayTopSlot, SmartSuggestions};
use crate::scoring::{
    CandidateSlot, DayPreference, PreferredTimeRange, SchedulingPreferences, ScoredSlot,
    TimeCategory,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_availability_handler,
        crate::handlers::get_week_availability_handler,
        crate::handlers::get_next_available_handler,
        crate::handlers::block_slots_handler,
        crate::handlers::create_booking_handler,
        crate::handlers::get_booking_handler,
        crate::handlers::cancel_booking_handler,
        crate::handlers::list_bookings_handler,
        crate::handlers::booking_stats_handler,
        crate::handlers::release_slot_handler,
        crate::handlers::smart_suggestions_handler,
        crate::handlers::week_suggestions_handler,
        crate::handlers::assistant_chat_handler
    ),
    components(
        schemas(
            SlotStatus,
            DayAvailabilityResponse,
            WeekAvailabilityResponse,
            NextSlot,
            NextAvailableResponse,
            BlockRequest,
            BlockResponse,
            NewBooking,
            Booking,
            BookingStatus,
            BookingResponse,
            MessageResponse,
            BookingListResponse,
            BookingStats,
            StatsResponse,
            ReleaseResponse,
            SchedulingPreferences,
            PreferredTimeRange,
            SmartSuggestionRequest,
            CandidateSlot,
            ScoredSlot,
            TimeCategory,
            DayPreference,
            SmartSuggestions,
            DayTopSlot,
            WeekSuggestionsResponse,
            ChatRequest,
            ChatResponse
        )
    ),
    tags(
        (name = "Availability", description = "Slot grids and next free slot"),
        (name = "Bookings", description = "Create, look up and cancel bookings"),
        (name = "Smart Scheduling", description = "Ranked slot suggestions"),
        (name = "Admin", description = "Blocking, listing and slot release"),
        (name = "Assistant", description = "Keyword chat replies")
    ),
    servers(
        (url = "/api", description = "NextDoor booking API")
    )
)]
pub struct BookingApiDoc;
