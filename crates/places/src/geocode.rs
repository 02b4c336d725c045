//! Free-text place search and reverse lookup (Nominatim dialect).

use serde::Deserialize;
use std::time::Duration;
use urlencoding::encode;

use wayfarer_core::{Error, Result};

const USER_AGENT: &str = "Wayfarer/1.0";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(5);
const REVERSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Broad category buckets for a search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceCategory {
    Urban,
    Nature,
    Tourist,
    Historical,
    General,
}

/// One search result row.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeHit {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub importance: Option<f64>,
}

impl GeocodeHit {
    pub fn category(&self) -> PlaceCategory {
        match self.kind.as_deref() {
            Some("city") | Some("town") | Some("village") => return PlaceCategory::Urban,
            _ => {}
        }
        match self.class.as_deref() {
            Some("natural") => PlaceCategory::Nature,
            Some("tourism") => PlaceCategory::Tourist,
            Some("historic") => PlaceCategory::Historical,
            _ => PlaceCategory::General,
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat.parse().ok()?, self.lon.parse().ok()?))
    }
}

/// Structured address from a reverse lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseAddress {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Reverse lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseResult {
    pub display_name: String,
    pub address: ReverseAddress,
}

impl ReverseResult {
    /// State if present, else county.
    pub fn administrative_area(&self) -> Option<&str> {
        self.address
            .state
            .as_deref()
            .or(self.address.county.as_deref())
    }
}

/// Client for the geocoding endpoints.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Free-text search returning up to `limit` hits.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<GeocodeHit>> {
        let url = format!(
            "{}/search?q={}&format=json&addressdetails=1&limit={}",
            self.base_url,
            encode(query),
            limit
        );
        let response = self
            .client
            .get(&url)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::remote(
                status.as_u16(),
                format!("place search failed for {:?}", query),
            ));
        }
        response
            .json()
            .await
            .map_err(|e| Error::network(format!("failed to parse search results: {}", e)))
    }

    /// Resolve coordinates to a structured address.
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Result<ReverseResult> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url, latitude, longitude
        );
        let response = self
            .client
            .get(&url)
            .timeout(REVERSE_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::remote(
                status.as_u16(),
                format!("reverse lookup failed for {},{}", latitude, longitude),
            ));
        }
        response
            .json()
            .await
            .map_err(|e| Error::network(format!("failed to parse reverse lookup: {}", e)))
    }
}
