// --- File: crates/nextdoor_booking/src/assistant.rs ---
//! Keyword replies for the booking assistant chat.

pub const PRICING_REPLY: &str =
    "Our pricing varies by service. House cleaning starts at $80, deep cleaning at $150.";
pub const AVAILABILITY_REPLY: &str =
    "We have availability throughout the week. Would you like to check a specific date?";
pub const SERVICES_REPLY: &str =
    "We offer house cleaning, deep cleaning, move-in/out cleaning, and office cleaning.";
pub const DEFAULT_REPLY: &str =
    "I can help you book an appointment. What service are you looking for?";

/// First matching keyword group wins, case-insensitively.
pub fn reply(message: &str) -> &'static str {
    let message = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| message.contains(w));

    if mentions(&["price", "cost"]) {
        PRICING_REPLY
    } else if mentions(&["available", "schedule"]) {
        AVAILABILITY_REPLY
    } else if mentions(&["service"]) {
        SERVICES_REPLY
    } else {
        DEFAULT_REPLY
    }
}
