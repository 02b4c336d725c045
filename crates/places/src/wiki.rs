//! Two-step encyclopedia lookup: search for the page, then pull the intro
//! extract and lead image. Strictly best-effort; callers render without a
//! summary when it is unavailable.

use log::debug;
use serde_json::Value;
use std::time::Duration;
use urlencoding::encode;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const THUMBNAIL_SIZE: u32 = 1000;

/// Intro extract and optional lead image for a place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiSummary {
    pub summary: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WikiClient {
    client: reqwest::Client,
    base_url: String,
}

impl WikiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up the intro summary for a place name. Display names like
    /// `"Kyoto, Kyoto Prefecture, Japan"` are reduced to their first
    /// component before searching.
    pub async fn summary(&self, place: &str) -> Option<WikiSummary> {
        let city = place.split(',').next().unwrap_or(place).trim();
        if city.is_empty() {
            return None;
        }

        match self.fetch_summary(city).await {
            Ok(found) => found,
            Err(reason) => {
                debug!("encyclopedia lookup for {:?} failed: {}", city, reason);
                None
            }
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, String> {
        let response = self
            .client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }
        response.json().await.map_err(|e| e.to_string())
    }

    async fn fetch_summary(&self, city: &str) -> Result<Option<WikiSummary>, String> {
        let search_url = format!(
            "{}/w/api.php?action=query&list=search&srsearch={}&format=json&origin=*",
            self.base_url,
            encode(city)
        );
        let search = self.get_json(&search_url).await?;

        let Some(page_id) = search["query"]["search"][0]["pageid"].as_u64() else {
            return Ok(None);
        };

        let content_url = format!(
            "{}/w/api.php?action=query&prop=extracts|pageimages&exintro&explaintext&format=json&origin=*&pageids={}&pithumbsize={}",
            self.base_url, page_id, THUMBNAIL_SIZE
        );
        let content = self.get_json(&content_url).await?;

        let page = &content["query"]["pages"][page_id.to_string()];
        let Some(extract) = page["extract"].as_str() else {
            return Ok(None);
        };

        Ok(Some(WikiSummary {
            summary: extract.to_string(),
            image: page["thumbnail"]["source"].as_str().map(String::from),
        }))
    }
}
