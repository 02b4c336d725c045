//! Destination content clients: free-text place search, encyclopedia
//! summaries, destination photos, and an orchestrating service that
//! enriches search hits and writes travel briefings through the AI
//! gateway.
//!
//! Outbound geocoding traffic is paced by an injected [`RateLimiter`] and
//! responses are held in TTL caches, both owned by the caller rather than
//! by module-level state. When the upstream services are unreachable the
//! service substitutes entries from a small table of well-known
//! destinations instead of failing the whole lookup.

mod geocode;
mod known;
mod limiter;
mod photos;
mod service;
mod wiki;

#[cfg(test)]
pub(crate) mod test_support;

pub use geocode::{GeocodeClient, GeocodeHit, PlaceCategory, ReverseResult};
pub use known::{known_destination, KnownDestination};
pub use limiter::{RateLimiter, TtlCache};
pub use photos::{Attribution, Photo, PhotoClient};
pub use service::{Attractions, Destination, DestinationDetails, PlacesService};
pub use wiki::{WikiClient, WikiSummary};
