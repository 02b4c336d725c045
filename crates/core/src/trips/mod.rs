//! Trip, itinerary and activity domain models.

mod model;

pub use model::*;
