//! Canned assistant replies used when the gateway cannot answer.
//!
//! Selection order: transport-level failures (offline, timeout, rate limit)
//! pick a failure-specific reply regardless of the question; otherwise the
//! last user message is keyword-matched against a small travel decision
//! table, with a generic suggestion as the last resort.

use rand::seq::SliceRandom;

use crate::client::{ChatMessage, ChatRole, FailureKind};

const OFFLINE_REPLY: &str = "It looks like you're offline right now. I can't reach the travel assistant without a connection, but your trips and itineraries are still available. Try again once you're back online.";

const TIMEOUT_REPLY: &str = "The travel assistant is taking longer than usual to respond. Your question wasn't lost, so please try asking again in a moment.";

const RATE_LIMITED_REPLY: &str = "The travel assistant is handling a lot of requests right now. Give it a minute and ask again.";

/// Keyword decision table: the first row whose keyword appears in the
/// question wins.
const KEYWORD_REPLIES: &[(&str, &str)] = &[
    (
        "hello",
        "Hello! I'm your travel assistant. Ask me about destinations, accommodation, food, flights, or planning your itinerary.",
    ),
    (
        "weather",
        "I can't check live weather at the moment, but it's worth looking at the seasonal averages for your destination and packing a layer for the evenings either way.",
    ),
    (
        "hotel",
        "For accommodation, staying close to the city center usually saves transit time, while neighborhoods one stop out tend to be cheaper and quieter. Booking a refundable rate keeps your plans flexible.",
    ),
    (
        "stay",
        "For accommodation, staying close to the city center usually saves transit time, while neighborhoods one stop out tend to be cheaper and quieter. Booking a refundable rate keeps your plans flexible.",
    ),
    (
        "accommodation",
        "For accommodation, staying close to the city center usually saves transit time, while neighborhoods one stop out tend to be cheaper and quieter. Booking a refundable rate keeps your plans flexible.",
    ),
    (
        "restaurant",
        "For food, places a few streets away from the main sights are usually better value. Lunch menus are often the same kitchen at a lower price, and a queue of locals is the best review there is.",
    ),
    (
        "food",
        "For food, places a few streets away from the main sights are usually better value. Lunch menus are often the same kitchen at a lower price, and a queue of locals is the best review there is.",
    ),
    (
        "eat",
        "For food, places a few streets away from the main sights are usually better value. Lunch menus are often the same kitchen at a lower price, and a queue of locals is the best review there is.",
    ),
    (
        "flight",
        "For flights, midweek departures are usually cheapest, and arriving a day early gives you a buffer against delays. Check whether your fare includes checked baggage before comparing prices.",
    ),
    (
        "plane",
        "For flights, midweek departures are usually cheapest, and arriving a day early gives you a buffer against delays. Check whether your fare includes checked baggage before comparing prices.",
    ),
    (
        "airport",
        "For flights, midweek departures are usually cheapest, and arriving a day early gives you a buffer against delays. Check whether your fare includes checked baggage before comparing prices.",
    ),
    (
        "budget",
        "A simple budget split that works for most trips: roughly a third on accommodation, a third on food and activities, and the rest on transport with a small reserve for surprises.",
    ),
    (
        "money",
        "A simple budget split that works for most trips: roughly a third on accommodation, a third on food and activities, and the rest on transport with a small reserve for surprises.",
    ),
    (
        "cost",
        "A simple budget split that works for most trips: roughly a third on accommodation, a third on food and activities, and the rest on transport with a small reserve for surprises.",
    ),
    (
        "itinerary",
        "When planning your itinerary, group nearby sights into the same day and leave one unplanned block per day. Two or three anchor activities daily beats a packed schedule you can't keep.",
    ),
    (
        "plan",
        "When planning your itinerary, group nearby sights into the same day and leave one unplanned block per day. Two or three anchor activities daily beats a packed schedule you can't keep.",
    ),
    (
        "schedule",
        "When planning your itinerary, group nearby sights into the same day and leave one unplanned block per day. Two or three anchor activities daily beats a packed schedule you can't keep.",
    ),
];

const GENERIC_REPLIES: &[&str] = &[
    "I'm having trouble reaching the travel assistant right now. In the meantime, you can keep editing your trips and itineraries, and I'll be back shortly.",
    "I couldn't get a full answer just now. Try rephrasing your question, or ask me about accommodation, food, flights, budgets, or itinerary planning.",
    "Something went wrong on my side. Your trip data is safe, and asking again in a moment usually does the trick.",
];

/// Pick a canned reply for the conversation, preferring failure-specific
/// wording for transport-level failures.
pub(crate) fn canned_reply(
    messages: &[ChatMessage],
    failure: Option<&FailureKind>,
) -> ChatMessage {
    let content = match failure {
        Some(FailureKind::Offline) => OFFLINE_REPLY.to_string(),
        Some(FailureKind::Timeout) | Some(FailureKind::Network(_)) => TIMEOUT_REPLY.to_string(),
        Some(FailureKind::RateLimited) => RATE_LIMITED_REPLY.to_string(),
        _ => keyword_reply(messages),
    };
    ChatMessage {
        role: ChatRole::Assistant,
        content,
    }
}

fn keyword_reply(messages: &[ChatMessage]) -> String {
    let question = messages
        .iter()
        .rev()
        .find(|m| m.role == ChatRole::User)
        .map(|m| m.content.to_lowercase())
        .unwrap_or_default();

    for (keyword, reply) in KEYWORD_REPLIES {
        if question.contains(keyword) {
            return (*reply).to_string();
        }
    }

    GENERIC_REPLIES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(GENERIC_REPLIES[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_match_uses_last_user_message() {
        let messages = [
            ChatMessage::user("what about the weather?"),
            ChatMessage::assistant("It should be mild."),
            ChatMessage::user("And where should I eat?"),
        ];
        let reply = canned_reply(&messages, None);
        assert!(reply.content.contains("food"), "got: {}", reply.content);
    }

    #[test]
    fn transport_failure_overrides_keyword_match() {
        let messages = [ChatMessage::user("Find me a hotel in Lisbon")];
        let reply = canned_reply(&messages, Some(&FailureKind::Timeout));
        assert_eq!(reply.content, TIMEOUT_REPLY);
    }

    #[test]
    fn gateway_error_still_keyword_matches() {
        let messages = [ChatMessage::user("Find me a hotel in Lisbon")];
        let reply = canned_reply(
            &messages,
            Some(&FailureKind::Api("bad gateway".to_string())),
        );
        assert!(
            reply.content.contains("accommodation"),
            "got: {}",
            reply.content
        );
    }

    #[test]
    fn unmatched_question_gets_a_generic_reply() {
        let messages = [ChatMessage::user("tell me a joke")];
        let reply = canned_reply(&messages, None);
        assert!(GENERIC_REPLIES.contains(&reply.content.as_str()));
    }

    #[test]
    fn empty_conversation_gets_a_generic_reply() {
        let reply = canned_reply(&[], None);
        assert_eq!(reply.role, ChatRole::Assistant);
        assert!(GENERIC_REPLIES.contains(&reply.content.as_str()));
    }
}
