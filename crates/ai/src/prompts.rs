//! Prompt builders for the assistant's structured features.

use crate::client::{ChatMessage, ChatOptions};

const ASSISTANT_SYSTEM_PROMPT: &str = "You are an AI travel assistant for the Wayfarer app. You help users plan trips, provide travel recommendations, answer questions about destinations, and offer personalized travel advice. Be friendly, helpful, and concise in your responses. If you don't know something, be honest about it.";

const RECOMMENDER_SYSTEM_PROMPT: &str =
    "You are a travel recommendation expert for the Wayfarer app.";

const PLANNER_SYSTEM_PROMPT: &str =
    "You are an expert travel itinerary planner for the Wayfarer app.";

/// Prepend the assistant persona to a free-form conversation.
pub fn conversation(history: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(ASSISTANT_SYSTEM_PROMPT));
    messages.extend_from_slice(history);
    messages
}

/// Preferences driving destination recommendations.
#[derive(Debug, Clone, Default)]
pub struct TravelPreferences {
    pub travel_style: Option<String>,
    pub budget: Option<String>,
    pub interests: Vec<String>,
    pub season: Option<String>,
    pub duration: Option<String>,
}

fn or_unspecified(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("Not specified")
}

/// Build the messages asking for destination recommendations.
pub fn recommendations_prompt(preferences: &TravelPreferences) -> Vec<ChatMessage> {
    let interests = if preferences.interests.is_empty() {
        "Not specified".to_string()
    } else {
        preferences.interests.join(", ")
    };

    let prompt = format!(
        "Based on the following user preferences, suggest 3-5 travel destinations with brief descriptions:\n\
         Travel Style: {}\n\
         Budget: {}\n\
         Interests: {}\n\
         Season: {}\n\
         Duration: {}\n\n\
         For each destination, explain:\n\
         1. Why it's a good match for their preferences\n\
         2. Best time to visit\n\
         3. One must-see attraction\n\
         4. Estimated daily budget",
        or_unspecified(&preferences.travel_style),
        or_unspecified(&preferences.budget),
        interests,
        or_unspecified(&preferences.season),
        or_unspecified(&preferences.duration),
    );

    vec![
        ChatMessage::system(RECOMMENDER_SYSTEM_PROMPT),
        ChatMessage::user(prompt),
    ]
}

/// Trip details driving day-by-day itinerary generation.
#[derive(Debug, Clone)]
pub struct TripPrompt {
    pub destination: String,
    pub duration_days: u32,
    pub start_date: String,
    pub end_date: String,
    pub interests: Vec<String>,
    pub budget: Option<String>,
}

/// Build the messages asking for a day-by-day itinerary, with the sampling
/// options the planner works best with.
pub fn itinerary_prompt(trip: &TripPrompt) -> (Vec<ChatMessage>, ChatOptions) {
    let interests = if trip.interests.is_empty() {
        "General sightseeing".to_string()
    } else {
        trip.interests.join(", ")
    };
    let budget = trip.budget.as_deref().unwrap_or("Medium");

    let prompt = format!(
        "Create a detailed day-by-day itinerary for a trip to {destination} for {days} days.\n\n\
         Trip Details:\n\
         - Destination: {destination}\n\
         - Duration: {days} days\n\
         - Start Date: {start}\n\
         - End Date: {end}\n\
         - Interests: {interests}\n\
         - Budget Level: {budget}\n\n\
         For each day, include:\n\
         1. Morning activities (with approximate times)\n\
         2. Lunch recommendation\n\
         3. Afternoon activities\n\
         4. Dinner recommendation\n\
         5. Evening activities (if applicable)\n\n\
         Also include practical tips like transportation between locations and estimated costs where relevant.",
        destination = trip.destination,
        days = trip.duration_days,
        start = trip.start_date,
        end = trip.end_date,
        interests = interests,
        budget = budget,
    );

    let options = ChatOptions {
        temperature: 0.8,
        max_tokens: 1500,
        ..ChatOptions::default()
    };

    (
        vec![
            ChatMessage::system(PLANNER_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ],
        options,
    )
}
