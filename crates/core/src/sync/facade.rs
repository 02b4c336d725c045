//! The read/write policy layer between the remote table API and the local
//! cache store.
//!
//! Reads degrade to the cache; a cache hit is returned as success, so the
//! caller cannot distinguish fresh from stale data by this contract. Writes
//! are remote-first and fail when the remote rejects them, with one
//! intentional asymmetry: trip creation degrades to a local-only record
//! (synthetic `local-<uuid>` id) on transient failure, so creating a trip
//! works offline.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::{itinerary_namespace, trips_namespace, CacheStore};
use crate::errors::{Error, Result};
use crate::trips::{
    Activity, ActivityUpdate, ItineraryDay, NewActivity, NewItineraryDay, NewTrip, Trip,
    TripUpdate,
};

/// Remote table API consumed by the façade.
///
/// Implementations are stateless request/response translators: one logical
/// operation maps to one request, failures are returned as errors rather
/// than panics, and no retry happens at this layer.
#[async_trait]
pub trait TripRemote: Send + Sync {
    async fn list_trips(&self, user_id: &str) -> Result<Vec<Trip>>;
    async fn get_trip(&self, trip_id: &str) -> Result<Trip>;
    async fn insert_trip(&self, new_trip: &NewTrip) -> Result<Trip>;
    async fn update_trip(&self, trip_id: &str, update: &TripUpdate) -> Result<Trip>;
    async fn delete_trip(&self, trip_id: &str) -> Result<()>;

    async fn list_itinerary(&self, trip_id: &str) -> Result<Vec<ItineraryDay>>;
    async fn insert_itinerary_day(&self, day: &NewItineraryDay) -> Result<ItineraryDay>;

    async fn insert_activity(&self, activity: &NewActivity) -> Result<Activity>;
    async fn update_activity(
        &self,
        activity_id: &str,
        update: &ActivityUpdate,
    ) -> Result<Activity>;
    async fn delete_activity(&self, activity_id: &str) -> Result<()>;
}

/// Offline-tolerant data access for trips, itinerary days and activities.
#[derive(Clone)]
pub struct TripSyncService {
    remote: Arc<dyn TripRemote>,
    cache: CacheStore,
}

impl TripSyncService {
    pub fn new(remote: Arc<dyn TripRemote>, cache: CacheStore) -> Self {
        Self { remote, cache }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    /// List the user's trips, remote-first with cache fallback.
    pub async fn list_trips(&self, user_id: &str) -> Result<Vec<Trip>> {
        let namespace = trips_namespace(user_id);
        match self.remote.list_trips(user_id).await {
            Ok(trips) => {
                self.mirror_put(&namespace, &trips).await;
                Ok(trips)
            }
            Err(err) => {
                warn!("list_trips remote failed, trying cache: {}", err);
                match self.cache.get_list::<Trip>(&namespace).await {
                    Ok(Some(cached)) => {
                        debug!("serving {} cached trips for {}", cached.len(), user_id);
                        Ok(cached)
                    }
                    Ok(None) => Err(err),
                    Err(cache_err) => {
                        warn!("trip cache read failed: {}", cache_err);
                        Err(err)
                    }
                }
            }
        }
    }

    /// Fetch one trip by id, scanning the user's cached list on failure.
    pub async fn get_trip(&self, user_id: &str, trip_id: &str) -> Result<Trip> {
        match self.remote.get_trip(trip_id).await {
            Ok(trip) => Ok(trip),
            Err(err) => {
                warn!("get_trip remote failed, trying cache: {}", err);
                let namespace = trips_namespace(user_id);
                match self.cache.get_list::<Trip>(&namespace).await {
                    Ok(Some(cached)) => cached
                        .into_iter()
                        .find(|t| t.id == trip_id)
                        .ok_or(err),
                    Ok(None) => Err(err),
                    Err(cache_err) => {
                        warn!("trip cache read failed: {}", cache_err);
                        Err(err)
                    }
                }
            }
        }
    }

    /// List a trip's itinerary days (with nested activities), remote-first
    /// with cache fallback.
    pub async fn list_itinerary(&self, trip_id: &str) -> Result<Vec<ItineraryDay>> {
        let namespace = itinerary_namespace(trip_id);
        match self.remote.list_itinerary(trip_id).await {
            Ok(days) => {
                self.mirror_put(&namespace, &days).await;
                Ok(days)
            }
            Err(err) => {
                warn!("list_itinerary remote failed, trying cache: {}", err);
                match self.cache.get_list::<ItineraryDay>(&namespace).await {
                    Ok(Some(cached)) => Ok(cached),
                    Ok(None) => Err(err),
                    Err(cache_err) => {
                        warn!("itinerary cache read failed: {}", cache_err);
                        Err(err)
                    }
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────

    /// Create a trip. On transient remote failure the trip is persisted as a
    /// local-only record with a synthetic client id; permanent rejections
    /// (validation, auth, constraint) still fail the write.
    pub async fn create_trip(&self, mut new_trip: NewTrip) -> Result<Trip> {
        new_trip.validate()?;
        new_trip.title = Some(new_trip.effective_title());

        let namespace = trips_namespace(&new_trip.user_id);
        match self.remote.insert_trip(&new_trip).await {
            Ok(trip) => {
                self.mirror_append(&namespace, &trip).await;
                Ok(trip)
            }
            Err(err) if err.is_transient() => {
                warn!("insert_trip failed ({}), keeping local-only record", err);
                let local = local_trip(new_trip);
                self.cache
                    .append_one(&namespace, &local)
                    .await
                    .map_err(|cache_err| {
                        warn!("local-only trip could not be cached: {}", cache_err);
                        err
                    })?;
                Ok(local)
            }
            Err(err) => Err(err),
        }
    }

    /// Update trip fields. Remote-first; no local-only write path. Date
    /// ordering is validated only within the update itself, not against
    /// the stored record, so a single-ended date update can invert the
    /// stored range.
    pub async fn update_trip(
        &self,
        user_id: &str,
        trip_id: &str,
        update: TripUpdate,
    ) -> Result<Trip> {
        update.validate()?;
        if update.is_empty() {
            return Err(Error::validation("no fields to update"));
        }
        if Trip::is_local_id(trip_id) {
            return Err(Error::validation(
                "trip exists only on this device and cannot be updated until it syncs",
            ));
        }

        let trip = self.remote.update_trip(trip_id, &update).await?;
        self.mirror_replace(&trips_namespace(user_id), trip_id, &trip)
            .await;
        Ok(trip)
    }

    /// Delete a trip and evict both its cache entry and its itinerary
    /// namespace; a remotely deleted trip must never survive locally.
    /// Local-only records were never on the server, so their deletion is
    /// cache-only.
    pub async fn delete_trip(&self, user_id: &str, trip_id: &str) -> Result<()> {
        if Trip::is_local_id(trip_id) {
            debug!("deleting local-only trip {} from cache", trip_id);
        } else {
            self.remote.delete_trip(trip_id).await?;
        }

        let namespace = trips_namespace(user_id);
        if let Err(err) = self.cache.remove_one(&namespace, trip_id).await {
            warn!("failed to evict deleted trip from cache: {}", err);
        }
        if let Err(err) = self
            .cache
            .remove_namespace(&itinerary_namespace(trip_id))
            .await
        {
            warn!("failed to evict itinerary for deleted trip: {}", err);
        }
        Ok(())
    }

    /// Create an itinerary day. Remote-first; mirrored as an append.
    pub async fn create_itinerary_day(&self, day: NewItineraryDay) -> Result<ItineraryDay> {
        day.validate()?;
        let created = self.remote.insert_itinerary_day(&day).await?;
        self.mirror_append(&itinerary_namespace(&day.trip_id), &created)
            .await;
        Ok(created)
    }

    /// Create an activity and patch it into the owning cached day.
    pub async fn create_activity(&self, trip_id: &str, activity: NewActivity) -> Result<Activity> {
        activity.validate()?;
        let created = self.remote.insert_activity(&activity).await?;
        self.mirror_day_edit(trip_id, |days| {
            if let Some(day) = days.iter_mut().find(|d| d.id == created.itinerary_day_id) {
                day.activities.push(created.clone());
            }
        })
        .await;
        Ok(created)
    }

    /// Update an activity and patch the owning cached day.
    pub async fn update_activity(
        &self,
        trip_id: &str,
        activity_id: &str,
        update: ActivityUpdate,
    ) -> Result<Activity> {
        update.validate()?;
        let updated = self.remote.update_activity(activity_id, &update).await?;
        self.mirror_day_edit(trip_id, |days| {
            for day in days.iter_mut() {
                if let Some(slot) = day.activities.iter_mut().find(|a| a.id == activity_id) {
                    *slot = updated.clone();
                }
            }
        })
        .await;
        Ok(updated)
    }

    /// Delete an activity and drop it from the cached itinerary.
    pub async fn delete_activity(&self, trip_id: &str, activity_id: &str) -> Result<()> {
        self.remote.delete_activity(activity_id).await?;
        self.mirror_day_edit(trip_id, |days| {
            for day in days.iter_mut() {
                day.activities.retain(|a| a.id != activity_id);
            }
        })
        .await;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Cache mirroring (best-effort, failures logged and swallowed)
    // ─────────────────────────────────────────────────────────────────────

    async fn mirror_put<T: serde::Serialize>(&self, namespace: &str, list: &[T]) {
        if let Err(err) = self.cache.put_list(namespace, list).await {
            warn!("failed to mirror {} into cache: {}", namespace, err);
        }
    }

    async fn mirror_append<T>(&self, namespace: &str, entity: &T)
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        if let Err(err) = self.cache.append_one(namespace, entity).await {
            warn!("failed to append into {}: {}", namespace, err);
        }
    }

    async fn mirror_replace<T>(&self, namespace: &str, id: &str, entity: &T)
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        if let Err(err) = self.cache.replace_one(namespace, id, entity).await {
            warn!("failed to replace {} in {}: {}", id, namespace, err);
        }
    }

    async fn mirror_day_edit<F>(&self, trip_id: &str, edit: F)
    where
        F: FnOnce(&mut Vec<ItineraryDay>),
    {
        let namespace = itinerary_namespace(trip_id);
        match self.cache.get_list::<ItineraryDay>(&namespace).await {
            Ok(Some(mut days)) => {
                edit(&mut days);
                self.mirror_put(&namespace, &days).await;
            }
            Ok(None) => {}
            Err(err) => warn!("itinerary cache read failed during mirror: {}", err),
        }
    }
}

/// Build the local-only record for an offline trip creation.
fn local_trip(new_trip: NewTrip) -> Trip {
    let now = Utc::now();
    Trip {
        id: format!("{}{}", crate::trips::LOCAL_ID_PREFIX, Uuid::new_v4()),
        user_id: new_trip.user_id,
        destination: new_trip.destination,
        title: new_trip.title,
        description: new_trip.description,
        start_date: new_trip.start_date,
        end_date: new_trip.end_date,
        status: new_trip.status,
        created_at: Some(now),
        updated_at: Some(now),
    }
}
