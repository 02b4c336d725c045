//! Entity shapes as exchanged with the hosted table API.
//!
//! Field names match the remote column names (snake_case), so these types
//! serialize 1:1 into request/response payloads. Responses may carry columns
//! the client does not know about; deserialization ignores them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Trip lifecycle status.
///
/// This is a flat enum, not a guarded state machine: `completed` and
/// `cancelled` are terminal for the normal flow but the backend enforces no
/// transition graph, and status can be re-set from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Planned,
    Active,
    Completed,
    Cancelled,
}

impl TripStatus {
    /// Terminal for the normal flow only; transitions out remain legal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl Default for TripStatus {
    fn default() -> Self {
        Self::Planned
    }
}

/// A user-owned travel plan with a destination and date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Id prefix assigned by the local-only offline fallback.
pub const LOCAL_ID_PREFIX: &str = "local-";

impl Trip {
    /// True for records created by the local-only offline fallback.
    pub fn is_local_only(&self) -> bool {
        Self::is_local_id(&self.id)
    }

    /// True for ids assigned by the local-only offline fallback; such
    /// records exist only in the device cache, never on the server.
    pub fn is_local_id(id: &str) -> bool {
        id.starts_with(LOCAL_ID_PREFIX)
    }
}

/// Payload for creating a trip. The id and timestamps are server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrip {
    pub user_id: String,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: TripStatus,
}

impl NewTrip {
    /// Check the client-enforced invariants before any request is issued.
    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(Error::validation("destination must not be empty"));
        }
        if self.end_date < self.start_date {
            return Err(Error::validation(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        Ok(())
    }

    /// Title defaults to the destination when the caller left it empty.
    pub fn effective_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self.destination.clone(),
        }
    }
}

/// Partial update for a trip. Absent fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TripStatus>,
}

impl TripUpdate {
    /// Date ordering is only checked when both ends are present in the
    /// update. A single-ended update can invert the stored range; nothing
    /// client-side cross-checks it against the current record, and the
    /// backend accepts it.
    pub fn validate(&self) -> Result<()> {
        if let Some(destination) = &self.destination {
            if destination.trim().is_empty() {
                return Err(Error::validation("destination must not be empty"));
            }
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(Error::validation(format!(
                    "end date {} is before start date {}",
                    end, start
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// One calendar day within a trip, with its nested activities.
///
/// Day numbers need not be contiguous but are expected to be monotonic with
/// date order; neither is enforced server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub id: String,
    pub trip_id: String,
    pub day_number: i32,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Payload for creating an itinerary day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItineraryDay {
    pub trip_id: String,
    pub day_number: i32,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl NewItineraryDay {
    pub fn validate(&self) -> Result<()> {
        if self.day_number < 1 {
            return Err(Error::validation("day number must be positive"));
        }
        Ok(())
    }
}

/// Activity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Transport,
    Accommodation,
    Food,
    Activity,
}

impl Default for ActivityKind {
    fn default() -> Self {
        Self::Activity
    }
}

/// A single planned event within an itinerary day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub itinerary_day_id: String,
    pub title: String,
    /// Free-form time-of-day string ("09:30", "afternoon").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ActivityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for creating an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    pub itinerary_day_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ActivityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewActivity {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("activity title must not be empty"));
        }
        Ok(())
    }
}

/// Partial update for an activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActivityKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ActivityUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(Error::validation("activity title must not be empty"));
            }
        }
        Ok(())
    }
}
