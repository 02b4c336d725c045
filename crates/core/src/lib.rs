//! Wayfarer core: domain models, validation, the local cache store and the
//! trip sync façade.
//!
//! This crate owns the remote-vs-cache policy. Network and storage substrates
//! live behind traits (`sync::TripRemote`, `cache::KeyValueStorage`) so the
//! façade can be exercised without I/O.

pub mod cache;
pub mod errors;
pub mod sync;
pub mod trips;

pub use errors::{Error, Result};
