//! REST client for the hosted backend: row-oriented table CRUD, auth
//! sessions, and the out-of-band schema migration runner.
//!
//! The table client speaks the PostgREST dialect (`eq.` filters, `order=`,
//! `Prefer: return=representation`); auth speaks the companion GoTrue-style
//! endpoints. All failures are captured and returned as errors, never
//! panics, and no retry happens at this layer.

mod auth;
mod client;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthClient, Session, SessionWatcher, User};
pub use client::TableClient;
