//! Destination photo lookup with attribution, degrading to a
//! keyword-matched stock image when the photo API is unavailable.

use log::debug;
use serde::Deserialize;
use std::time::Duration;
use urlencoding::encode;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const FALLBACK_DEFAULT: &str = "https://images.unsplash.com/photo-1501785888041-af3ef285b470";
const FALLBACK_CITY: &str = "https://images.unsplash.com/photo-1477959858617-67f85cf4f1df";
const FALLBACK_NATURE: &str = "https://images.unsplash.com/photo-1441974231531-c6227db76b6e";
const FALLBACK_LANDMARK: &str = "https://images.unsplash.com/photo-1488747279002-c8523379faaa";
const FALLBACK_BEACH: &str = "https://images.unsplash.com/photo-1507525428034-b723cf961d3e";
const FALLBACK_MOUNTAIN: &str = "https://images.unsplash.com/photo-1464822759023-fed622ff2c3b";

/// Photographer credit required by the photo API's terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub name: String,
    pub username: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub url: String,
    /// Absent for fallback stock images.
    pub attribution: Option<Attribution>,
}

#[derive(Debug, Deserialize)]
struct PhotoRow {
    urls: PhotoUrls,
    user: PhotoUser,
    links: PhotoLinks,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: String,
    username: String,
}

#[derive(Debug, Deserialize)]
struct PhotoLinks {
    html: String,
}

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        Photo {
            url: row.urls.regular,
            attribution: Some(Attribution {
                name: row.user.name,
                username: row.user.username,
                link: row.links.html,
            }),
        }
    }
}

/// Client for the photo search API. All lookups are infallible; failures
/// fall back to stock images keyed on the query.
#[derive(Debug, Clone)]
pub struct PhotoClient {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl PhotoClient {
    pub fn new(base_url: &str, access_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        }
    }

    /// One random landscape photo matching the query.
    pub async fn random_photo(&self, query: &str) -> Photo {
        match self.fetch_one(query).await {
            Ok(photo) => photo,
            Err(reason) => {
                debug!("photo lookup for {:?} failed: {}", query, reason);
                Photo {
                    url: fallback_image(query).to_string(),
                    attribution: None,
                }
            }
        }
    }

    /// Several random landscape photos matching the query.
    pub async fn random_photos(&self, query: &str, count: u32) -> Vec<Photo> {
        match self.fetch_many(query, count).await {
            Ok(photos) => photos,
            Err(reason) => {
                debug!("photo batch for {:?} failed: {}", query, reason);
                (0..count)
                    .map(|_| Photo {
                        url: fallback_image(query).to_string(),
                        attribution: None,
                    })
                    .collect()
            }
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, String> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }
        Ok(response)
    }

    async fn fetch_one(&self, query: &str) -> Result<Photo, String> {
        let url = format!(
            "{}/photos/random?query={}&orientation=landscape",
            self.base_url,
            encode(query)
        );
        let row: PhotoRow = self.get(&url).await?.json().await.map_err(|e| e.to_string())?;
        Ok(row.into())
    }

    async fn fetch_many(&self, query: &str, count: u32) -> Result<Vec<Photo>, String> {
        let url = format!(
            "{}/photos/random?query={}&count={}&orientation=landscape",
            self.base_url,
            encode(query),
            count
        );
        let rows: Vec<PhotoRow> = self.get(&url).await?.json().await.map_err(|e| e.to_string())?;
        Ok(rows.into_iter().map(Photo::from).collect())
    }
}

/// Stock image for a query when the photo API fails.
fn fallback_image(query: &str) -> &'static str {
    let query = query.to_lowercase();
    if query.contains("beach") {
        FALLBACK_BEACH
    } else if query.contains("mountain") {
        FALLBACK_MOUNTAIN
    } else if query.contains("nature") {
        FALLBACK_NATURE
    } else if query.contains("city") {
        FALLBACK_CITY
    } else if query.contains("landmark") {
        FALLBACK_LANDMARK
    } else {
        FALLBACK_DEFAULT
    }
}
