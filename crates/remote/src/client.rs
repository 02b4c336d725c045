//! Table API client for the hosted relational backend.
//!
//! One logical operation maps to one REST request. The client is stateless
//! apart from the bearer token it attaches to requests; retry and cache
//! fallback are the sync façade's concern, not this layer's.

use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use async_trait::async_trait;
use wayfarer_core::sync::TripRemote;
use wayfarer_core::trips::{
    Activity, ActivityUpdate, ItineraryDay, NewActivity, NewItineraryDay, NewTrip, Trip,
    TripUpdate,
};
use wayfarer_core::{Error, Result};

use crate::schema::{self, Migration};

/// Default timeout for table API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOG_BODY_CHARS: usize = 512;

/// Accept header that asks the backend for a single object instead of a
/// one-element array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Error body shape returned by the table API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

/// Client for the hosted table API.
#[derive(Debug, Clone)]
pub struct TableClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl TableClient {
    /// Create a new table client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the hosted backend (e.g. "https://xyz.example.co")
    /// * `api_key` - Project API key, also used as the bearer token until a
    ///   user session is attached.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Attach (or clear) the signed-in user's access token. Row-level
    /// security is enforced server-side from this token.
    pub async fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| Error::network("invalid API key format"))?;
        headers.insert("apikey", api_key);

        let token = self.access_token.read().await;
        let bearer = format!("Bearer {}", token.as_deref().unwrap_or(&self.api_key));
        let auth = HeaderValue::from_str(&bearer)
            .map_err(|_| Error::network("invalid access token format"))?;
        headers.insert(AUTHORIZATION, auth);

        Ok(headers)
    }

    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("table API response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("table API response error ({}): {}", status, preview);
    }

    fn map_transport(err: reqwest::Error) -> Error {
        if let Some(status) = err.status() {
            return Error::remote(status.as_u16(), err.to_string());
        }
        Error::network(err.to_string())
    }

    /// Parse a JSON response body, converting non-2xx statuses into remote
    /// rejections carrying the backend's message.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(Self::map_transport)?;
        Self::log_response(status, &body);

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ApiErrorBody>(&body) {
                let message = match error.code {
                    Some(code) => format!("{}: {}", code, error.message),
                    None => error.message,
                };
                return Err(Error::remote(status.as_u16(), message));
            }
            return Err(Error::remote(
                status.as_u16(),
                format!("request failed: {}", body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::remote(
                status.as_u16(),
                format!("failed to parse response: {}", e),
            )
        })
    }

    async fn expect_success(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.map_err(Self::map_transport)?;
        Self::log_response(status, &body);
        if let Ok(error) = serde_json::from_str::<ApiErrorBody>(&body) {
            return Err(Error::remote(status.as_u16(), error.message));
        }
        Err(Error::remote(
            status.as_u16(),
            format!("request failed: {}", body),
        ))
    }

    async fn insert_row<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        payload: serde_json::Value,
    ) -> Result<T> {
        let mut headers = self.headers().await?;
        headers.insert(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT));
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let response = self
            .client
            .post(self.table_url(table))
            .headers(headers)
            .json(&payload)
            .send()
            .await
            .map_err(Self::map_transport)?;
        Self::parse_response(response).await
    }

    async fn update_row<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
        payload: serde_json::Value,
    ) -> Result<T> {
        let mut headers = self.headers().await?;
        headers.insert(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT));
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let url = format!("{}?id=eq.{}", self.table_url(table), urlencoding::encode(id));
        let response = self
            .client
            .patch(&url)
            .headers(headers)
            .json(&payload)
            .send()
            .await
            .map_err(Self::map_transport)?;
        Self::parse_response(response).await
    }

    async fn delete_row(&self, table: &str, id: &str) -> Result<()> {
        let url = format!("{}?id=eq.{}", self.table_url(table), urlencoding::encode(id));
        let response = self
            .client
            .delete(&url)
            .headers(self.headers().await?)
            .send()
            .await
            .map_err(Self::map_transport)?;
        Self::expect_success(response).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Schema migrations (operator-run, out-of-band from application start)
    // ─────────────────────────────────────────────────────────────────────

    /// Apply every migration with a version greater than `from_version`, in
    /// order. Returns the number applied. Run by an operator/setup tool;
    /// the application itself never patches schema at runtime.
    pub async fn apply_migrations(&self, from_version: u32) -> Result<u32> {
        let mut applied = 0;
        for migration in schema::migrations() {
            if migration.version <= from_version {
                continue;
            }
            self.exec_migration(migration).await?;
            info!(
                "applied schema migration v{} ({})",
                migration.version, migration.name
            );
            applied += 1;
        }
        Ok(applied)
    }

    async fn exec_migration(&self, migration: &Migration) -> Result<()> {
        let url = format!("{}/rest/v1/rpc/exec_sql", self.base_url);
        let response = self
            .client
            .post(&url)
            .headers(self.headers().await?)
            .json(&serde_json::json!({ "sql": migration.sql }))
            .send()
            .await
            .map_err(Self::map_transport)?;
        Self::expect_success(response).await
    }
}

/// Drop payload fields that are not known columns of the target table.
/// Each drop is logged; submitting an unknown column would fail the whole
/// request server-side.
fn sanitize_payload(payload: serde_json::Value, allowed: &[&str], table: &str) -> serde_json::Value {
    let serde_json::Value::Object(map) = payload else {
        return payload;
    };
    let mut clean = serde_json::Map::with_capacity(map.len());
    for (key, value) in map {
        if allowed.contains(&key.as_str()) {
            clean.insert(key, value);
        } else {
            debug!("dropping unknown column {}.{} from payload", table, key);
        }
    }
    serde_json::Value::Object(clean)
}

#[async_trait]
impl TripRemote for TableClient {
    async fn list_trips(&self, user_id: &str) -> Result<Vec<Trip>> {
        let url = format!(
            "{}?select=*&user_id=eq.{}&order=start_date.asc",
            self.table_url("trips"),
            urlencoding::encode(user_id)
        );
        let response = self
            .client
            .get(&url)
            .headers(self.headers().await?)
            .send()
            .await
            .map_err(Self::map_transport)?;
        Self::parse_response(response).await
    }

    async fn get_trip(&self, trip_id: &str) -> Result<Trip> {
        let url = format!(
            "{}?select=*&id=eq.{}",
            self.table_url("trips"),
            urlencoding::encode(trip_id)
        );
        let mut headers = self.headers().await?;
        headers.insert(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT));

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(Self::map_transport)?;
        Self::parse_response(response).await
    }

    async fn insert_trip(&self, new_trip: &NewTrip) -> Result<Trip> {
        let payload = sanitize_payload(
            serde_json::to_value(new_trip)?,
            schema::TRIP_COLUMNS,
            "trips",
        );
        self.insert_row("trips", payload).await
    }

    async fn update_trip(&self, trip_id: &str, update: &TripUpdate) -> Result<Trip> {
        let payload = sanitize_payload(
            serde_json::to_value(update)?,
            schema::TRIP_COLUMNS,
            "trips",
        );
        self.update_row("trips", trip_id, payload).await
    }

    async fn delete_trip(&self, trip_id: &str) -> Result<()> {
        self.delete_row("trips", trip_id).await
    }

    async fn list_itinerary(&self, trip_id: &str) -> Result<Vec<ItineraryDay>> {
        let url = format!(
            "{}?select=*,activities(*)&trip_id=eq.{}&order=day_number.asc",
            self.table_url("itinerary_days"),
            urlencoding::encode(trip_id)
        );
        let response = self
            .client
            .get(&url)
            .headers(self.headers().await?)
            .send()
            .await
            .map_err(Self::map_transport)?;
        Self::parse_response(response).await
    }

    async fn insert_itinerary_day(&self, day: &NewItineraryDay) -> Result<ItineraryDay> {
        let payload = sanitize_payload(
            serde_json::to_value(day)?,
            schema::ITINERARY_DAY_COLUMNS,
            "itinerary_days",
        );
        self.insert_row("itinerary_days", payload).await
    }

    async fn insert_activity(&self, activity: &NewActivity) -> Result<Activity> {
        let payload = sanitize_payload(
            serde_json::to_value(activity)?,
            schema::ACTIVITY_COLUMNS,
            "activities",
        );
        self.insert_row("activities", payload).await
    }

    async fn update_activity(
        &self,
        activity_id: &str,
        update: &ActivityUpdate,
    ) -> Result<Activity> {
        let payload = sanitize_payload(
            serde_json::to_value(update)?,
            schema::ACTIVITY_COLUMNS,
            "activities",
        );
        self.update_row("activities", activity_id, payload).await
    }

    async fn delete_activity(&self, activity_id: &str) -> Result<()> {
        self.delete_row("activities", activity_id).await
    }
}
