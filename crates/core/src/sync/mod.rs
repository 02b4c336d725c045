//! Trip sync façade: remote-first reads with cache fallback, remote-first
//! writes with cache mirroring.

mod facade;

pub use facade::{TripRemote, TripSyncService};

#[cfg(test)]
mod tests;
