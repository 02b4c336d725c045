use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::cache::{trips_namespace, CacheStore, MemoryStorage};
use crate::errors::{Error, Result};
use crate::sync::{TripRemote, TripSyncService};
use crate::trips::{
    Activity, ActivityKind, ActivityUpdate, ItineraryDay, NewActivity, NewItineraryDay, NewTrip,
    Trip, TripStatus, TripUpdate,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum FailureMode {
    /// Unreachable host / 5xx; reads degrade, trip creation goes local.
    Transient,
    /// Constraint or auth rejection; never degraded.
    Permanent,
}

/// In-memory remote standing in for the hosted table API.
#[derive(Default)]
struct MockRemote {
    trips: Mutex<Vec<Trip>>,
    days: Mutex<Vec<ItineraryDay>>,
    failure: Mutex<Option<FailureMode>>,
    calls: AtomicUsize,
}

impl MockRemote {
    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn set_failure(&self, mode: Option<FailureMode>) {
        *self.failure.lock().await = mode;
    }

    async fn gate(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match *self.failure.lock().await {
            Some(FailureMode::Transient) => Err(Error::network("connection refused")),
            Some(FailureMode::Permanent) => Err(Error::remote(400, "constraint violation")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TripRemote for MockRemote {
    async fn list_trips(&self, user_id: &str) -> Result<Vec<Trip>> {
        self.gate().await?;
        Ok(self
            .trips
            .lock()
            .await
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_trip(&self, trip_id: &str) -> Result<Trip> {
        self.gate().await?;
        self.trips
            .lock()
            .await
            .iter()
            .find(|t| t.id == trip_id)
            .cloned()
            .ok_or_else(|| Error::remote(406, "0 rows returned"))
    }

    async fn insert_trip(&self, new_trip: &NewTrip) -> Result<Trip> {
        self.gate().await?;
        let now = Utc::now();
        let trip = Trip {
            id: Uuid::new_v4().to_string(),
            user_id: new_trip.user_id.clone(),
            destination: new_trip.destination.clone(),
            title: new_trip.title.clone(),
            description: new_trip.description.clone(),
            start_date: new_trip.start_date,
            end_date: new_trip.end_date,
            status: new_trip.status,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.trips.lock().await.push(trip.clone());
        Ok(trip)
    }

    async fn update_trip(&self, trip_id: &str, update: &TripUpdate) -> Result<Trip> {
        self.gate().await?;
        let mut trips = self.trips.lock().await;
        let trip = trips
            .iter_mut()
            .find(|t| t.id == trip_id)
            .ok_or_else(|| Error::remote(406, "0 rows returned"))?;
        if let Some(destination) = &update.destination {
            trip.destination = destination.clone();
        }
        if let Some(status) = update.status {
            trip.status = status;
        }
        if let Some(start) = update.start_date {
            trip.start_date = start;
        }
        if let Some(end) = update.end_date {
            trip.end_date = end;
        }
        trip.updated_at = Some(Utc::now());
        Ok(trip.clone())
    }

    async fn delete_trip(&self, trip_id: &str) -> Result<()> {
        self.gate().await?;
        self.trips.lock().await.retain(|t| t.id != trip_id);
        Ok(())
    }

    async fn list_itinerary(&self, trip_id: &str) -> Result<Vec<ItineraryDay>> {
        self.gate().await?;
        Ok(self
            .days
            .lock()
            .await
            .iter()
            .filter(|d| d.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn insert_itinerary_day(&self, day: &NewItineraryDay) -> Result<ItineraryDay> {
        self.gate().await?;
        let created = ItineraryDay {
            id: Uuid::new_v4().to_string(),
            trip_id: day.trip_id.clone(),
            day_number: day.day_number,
            date: day.date,
            title: day.title.clone(),
            activities: Vec::new(),
        };
        self.days.lock().await.push(created.clone());
        Ok(created)
    }

    async fn insert_activity(&self, activity: &NewActivity) -> Result<Activity> {
        self.gate().await?;
        let created = Activity {
            id: Uuid::new_v4().to_string(),
            itinerary_day_id: activity.itinerary_day_id.clone(),
            title: activity.title.clone(),
            time: activity.time.clone(),
            kind: activity.kind,
            notes: activity.notes.clone(),
        };
        let mut days = self.days.lock().await;
        let day = days
            .iter_mut()
            .find(|d| d.id == activity.itinerary_day_id)
            .ok_or_else(|| Error::remote(409, "foreign key violation"))?;
        day.activities.push(created.clone());
        Ok(created)
    }

    async fn update_activity(
        &self,
        activity_id: &str,
        update: &ActivityUpdate,
    ) -> Result<Activity> {
        self.gate().await?;
        let mut days = self.days.lock().await;
        for day in days.iter_mut() {
            if let Some(activity) = day.activities.iter_mut().find(|a| a.id == activity_id) {
                if let Some(title) = &update.title {
                    activity.title = title.clone();
                }
                if let Some(time) = &update.time {
                    activity.time = Some(time.clone());
                }
                if let Some(kind) = update.kind {
                    activity.kind = kind;
                }
                return Ok(activity.clone());
            }
        }
        Err(Error::remote(406, "0 rows returned"))
    }

    async fn delete_activity(&self, activity_id: &str) -> Result<()> {
        self.gate().await?;
        let mut days = self.days.lock().await;
        for day in days.iter_mut() {
            day.activities.retain(|a| a.id != activity_id);
        }
        Ok(())
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

fn kyoto_trip(user_id: &str) -> NewTrip {
    NewTrip {
        user_id: user_id.to_string(),
        destination: "Kyoto".to_string(),
        title: None,
        description: None,
        start_date: date("2025-10-01"),
        end_date: date("2025-10-05"),
        status: TripStatus::Planned,
    }
}

fn service() -> (Arc<MockRemote>, CacheStore, TripSyncService) {
    let remote = Arc::new(MockRemote::default());
    let cache = CacheStore::new(Arc::new(MemoryStorage::new()));
    let facade = TripSyncService::new(remote.clone(), cache.clone());
    (remote, cache, facade)
}

#[tokio::test]
async fn create_then_get_preserves_input_fields() {
    let (_remote, _cache, facade) = service();
    let created = facade.create_trip(kyoto_trip("user-1")).await.expect("create");
    let fetched = facade.get_trip("user-1", &created.id).await.expect("get");

    assert_eq!(fetched.destination, "Kyoto");
    assert_eq!(fetched.title.as_deref(), Some("Kyoto"));
    assert_eq!(fetched.start_date, date("2025-10-01"));
    assert_eq!(fetched.end_date, date("2025-10-05"));
    assert_eq!(fetched.status, TripStatus::Planned);
    assert!(fetched.created_at.is_some());
}

#[tokio::test]
async fn list_trips_serves_cache_after_remote_degrades() {
    let (remote, _cache, facade) = service();
    facade.create_trip(kyoto_trip("user-1")).await.expect("create");
    let fresh = facade.list_trips("user-1").await.expect("warm read");
    assert_eq!(fresh.len(), 1);

    remote.set_failure(Some(FailureMode::Transient)).await;
    let cached = facade.list_trips("user-1").await.expect("cached read");
    assert_eq!(cached, fresh);
}

#[tokio::test]
async fn list_trips_without_prior_success_propagates_error() {
    let (remote, _cache, facade) = service();
    remote.set_failure(Some(FailureMode::Transient)).await;
    let result = facade.list_trips("user-1").await;
    assert!(matches!(result, Err(Error::Network(_))));
}

#[tokio::test]
async fn invalid_dates_issue_zero_remote_calls() {
    let (remote, _cache, facade) = service();
    let mut inverted = kyoto_trip("user-1");
    inverted.end_date = date("2025-09-30");

    let result = facade.create_trip(inverted).await;
    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(remote.call_count(), 0);
}

#[tokio::test]
async fn deleted_trip_never_served_from_cache() {
    let (remote, _cache, facade) = service();
    let created = facade.create_trip(kyoto_trip("user-1")).await.expect("create");
    facade.list_trips("user-1").await.expect("warm read");

    facade
        .delete_trip("user-1", &created.id)
        .await
        .expect("delete");

    remote.set_failure(Some(FailureMode::Transient)).await;
    let cached = facade.list_trips("user-1").await.expect("cached read");
    assert!(cached.iter().all(|t| t.id != created.id));
}

#[tokio::test]
async fn created_trip_lands_in_list_and_cache_namespace() {
    let (_remote, cache, facade) = service();
    let created = facade.create_trip(kyoto_trip("user-1")).await.expect("create");

    let listed = facade.list_trips("user-1").await.expect("list");
    assert!(listed.iter().any(|t| t.id == created.id));

    let namespace = trips_namespace("user-1");
    let direct: Vec<Trip> = cache
        .get_list(&namespace)
        .await
        .expect("cache read")
        .expect("namespace present");
    assert!(direct.iter().any(|t| t.id == created.id));
}

#[tokio::test]
async fn offline_create_falls_back_to_local_record() {
    let (remote, _cache, facade) = service();
    remote.set_failure(Some(FailureMode::Transient)).await;

    let created = facade.create_trip(kyoto_trip("user-1")).await.expect("create");
    assert!(created.is_local_only());
    assert_eq!(created.destination, "Kyoto");

    // Still offline: the local record is served from cache.
    let listed = facade.list_trips("user-1").await.expect("cached read");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
}

#[tokio::test]
async fn permanent_rejection_fails_trip_creation() {
    let (remote, cache, facade) = service();
    remote.set_failure(Some(FailureMode::Permanent)).await;

    let result = facade.create_trip(kyoto_trip("user-1")).await;
    assert!(matches!(result, Err(Error::Remote { status: 400, .. })));

    let namespace = trips_namespace("user-1");
    let cached: Option<Vec<Trip>> = cache.get_list(&namespace).await.expect("cache read");
    assert!(cached.is_none());
}

#[tokio::test]
async fn update_trip_mirrors_into_cache() {
    let (remote, _cache, facade) = service();
    let created = facade.create_trip(kyoto_trip("user-1")).await.expect("create");
    facade.list_trips("user-1").await.expect("warm read");

    facade
        .update_trip(
            "user-1",
            &created.id,
            TripUpdate {
                status: Some(TripStatus::Active),
                ..Default::default()
            },
        )
        .await
        .expect("update");

    remote.set_failure(Some(FailureMode::Transient)).await;
    let cached = facade.list_trips("user-1").await.expect("cached read");
    assert_eq!(cached[0].status, TripStatus::Active);
}

#[tokio::test]
async fn single_ended_date_update_is_not_cross_checked() {
    let (_remote, _cache, facade) = service();
    let created = facade.create_trip(kyoto_trip("user-1")).await.expect("create");

    // Only end_date is sent; nothing compares it to the stored start_date.
    let updated = facade
        .update_trip(
            "user-1",
            &created.id,
            TripUpdate {
                end_date: Some(date("2025-09-01")),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.end_date, date("2025-09-01"));
    assert!(updated.end_date < updated.start_date);
}

#[tokio::test]
async fn local_only_trip_update_is_rejected_without_remote_call() {
    let (remote, _cache, facade) = service();
    remote.set_failure(Some(FailureMode::Transient)).await;
    let local = facade.create_trip(kyoto_trip("user-1")).await.expect("create");
    assert!(local.is_local_only());

    remote.set_failure(None).await;
    let calls_before = remote.call_count();
    let result = facade
        .update_trip(
            "user-1",
            &local.id,
            TripUpdate {
                status: Some(TripStatus::Active),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(remote.call_count(), calls_before);
}

#[tokio::test]
async fn local_only_trip_delete_is_cache_only() {
    let (remote, cache, facade) = service();
    remote.set_failure(Some(FailureMode::Transient)).await;
    let local = facade.create_trip(kyoto_trip("user-1")).await.expect("create");

    let calls_before = remote.call_count();
    facade
        .delete_trip("user-1", &local.id)
        .await
        .expect("delete");
    assert_eq!(remote.call_count(), calls_before);

    let cached: Vec<Trip> = cache
        .get_list(&trips_namespace("user-1"))
        .await
        .expect("cache read")
        .expect("namespace present");
    assert!(cached.is_empty());
}

#[tokio::test]
async fn empty_update_is_a_validation_error() {
    let (remote, _cache, facade) = service();
    let result = facade
        .update_trip("user-1", "t-1", TripUpdate::default())
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(remote.call_count(), 0);
}

#[tokio::test]
async fn activity_writes_patch_the_cached_day() {
    let (remote, _cache, facade) = service();
    let trip = facade.create_trip(kyoto_trip("user-1")).await.expect("create");
    let day = facade
        .create_itinerary_day(NewItineraryDay {
            trip_id: trip.id.clone(),
            day_number: 1,
            date: date("2025-10-01"),
            title: None,
        })
        .await
        .expect("create day");
    facade.list_itinerary(&trip.id).await.expect("warm read");

    let activity = facade
        .create_activity(
            &trip.id,
            NewActivity {
                itinerary_day_id: day.id.clone(),
                title: "Fushimi Inari".to_string(),
                time: Some("09:00".to_string()),
                kind: ActivityKind::Activity,
                notes: None,
            },
        )
        .await
        .expect("create activity");

    remote.set_failure(Some(FailureMode::Transient)).await;
    let cached = facade.list_itinerary(&trip.id).await.expect("cached read");
    assert_eq!(cached[0].activities.len(), 1);
    assert_eq!(cached[0].activities[0].id, activity.id);

    remote.set_failure(None).await;
    facade
        .delete_activity(&trip.id, &activity.id)
        .await
        .expect("delete activity");

    remote.set_failure(Some(FailureMode::Transient)).await;
    let cached = facade.list_itinerary(&trip.id).await.expect("cached read");
    assert!(cached[0].activities.is_empty());
}

#[tokio::test]
async fn get_trip_falls_back_to_cached_list_scan() {
    let (remote, _cache, facade) = service();
    let created = facade.create_trip(kyoto_trip("user-1")).await.expect("create");
    facade.list_trips("user-1").await.expect("warm read");

    remote.set_failure(Some(FailureMode::Transient)).await;
    let fetched = facade
        .get_trip("user-1", &created.id)
        .await
        .expect("cached get");
    assert_eq!(fetched.id, created.id);

    let missing = facade.get_trip("user-1", "no-such-trip").await;
    assert!(missing.is_err());
}
