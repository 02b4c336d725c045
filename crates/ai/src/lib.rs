//! AI gateway client: one chat-completion HTTP endpoint wrapped with
//! connectivity checking, growing per-attempt timeouts, a bounded retry
//! loop, and a keyword-matched canned fallback.
//!
//! `send_message` never fails: every failure path degrades to a canned
//! assistant reply. Degrading gracefully is the contract, not an accident.

mod client;
mod fallback;
mod prompts;

pub use client::{
    AiClientConfig, AiGatewayClient, AlwaysConnected, ChatMessage, ChatOptions, ChatRole,
    ConnectivityProbe, FailureKind,
};
pub use prompts::{
    conversation, itinerary_prompt, recommendations_prompt, TravelPreferences, TripPrompt,
};
