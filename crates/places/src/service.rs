//! Destination orchestration: search enrichment, travel briefings, and
//! attraction guides, stitched from the geocode, encyclopedia, photo, and
//! AI clients.

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use wayfarer_ai::{AiGatewayClient, ChatMessage, ChatOptions};
use wayfarer_core::Result;

use crate::geocode::{GeocodeClient, GeocodeHit, ReverseResult};
use crate::known::known_destination;
use crate::limiter::{RateLimiter, TtlCache};
use crate::photos::PhotoClient;
use crate::wiki::WikiClient;

const SEARCH_LIMIT: u32 = 5;

const BRIEFING_SYSTEM_PROMPT: &str = "You are a knowledgeable travel expert. Provide accurate, concise, and well-structured information about destinations.";
const GUIDE_SYSTEM_PROMPT: &str = "You are a local tour guide expert. Provide detailed, engaging information about attractions that would interest visitors.";

/// An enriched search hit.
#[derive(Debug, Clone)]
pub struct Destination {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kind: Option<String>,
    pub importance: Option<f64>,
    pub summary: Option<String>,
    pub image: Option<String>,
}

/// Full briefing for one destination.
#[derive(Debug, Clone)]
pub struct DestinationDetails {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    /// Long-form travel briefing.
    pub details: String,
    pub image: Option<String>,
    pub address: Option<String>,
    pub administrative_area: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub currency: Option<String>,
}

/// Attraction guide for a destination.
#[derive(Debug, Clone)]
pub struct Attractions {
    /// Geocoded places feeding the guide; empty for table-served entries.
    pub places: Vec<GeocodeHit>,
    pub details: String,
}

pub struct PlacesService {
    geocode: GeocodeClient,
    wiki: WikiClient,
    photos: PhotoClient,
    assistant: Arc<AiGatewayClient>,
    limiter: Arc<RateLimiter>,
    search_cache: TtlCache<Vec<Destination>>,
    details_cache: TtlCache<DestinationDetails>,
}

impl PlacesService {
    pub fn new(
        geocode: GeocodeClient,
        wiki: WikiClient,
        photos: PhotoClient,
        assistant: Arc<AiGatewayClient>,
        limiter: Arc<RateLimiter>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            geocode,
            wiki,
            photos,
            assistant,
            limiter,
            search_cache: TtlCache::new(cache_ttl),
            details_cache: TtlCache::new(cache_ttl),
        }
    }

    /// Search destinations by free text, enriching each hit with an
    /// encyclopedia summary. Queries shorter than two characters return
    /// empty without touching the network.
    pub async fn search(&self, query: &str) -> Result<Vec<Destination>> {
        let query = query.trim();
        if query.len() < 2 {
            return Ok(Vec::new());
        }

        let cache_key = format!("search:{}", query);
        if let Some(cached) = self.search_cache.get(&cache_key).await {
            debug!("serving cached search for {:?}", query);
            return Ok(cached);
        }

        self.limiter.acquire().await;
        let hits = self.geocode.search(query, SEARCH_LIMIT).await?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some((latitude, longitude)) = hit.coordinates() else {
                warn!("dropping search hit with unparseable coordinates: {}", hit.display_name);
                continue;
            };
            let wiki = self.wiki.summary(&hit.display_name).await;
            results.push(Destination {
                name: hit.display_name,
                latitude,
                longitude,
                kind: hit.kind,
                importance: hit.importance,
                summary: wiki.as_ref().map(|w| w.summary.clone()),
                image: wiki.and_then(|w| w.image),
            });
        }

        self.search_cache.insert(cache_key, results.clone()).await;
        Ok(results)
    }

    /// Full briefing for a destination: encyclopedia summary, resolved
    /// address, and an AI-written travel briefing. When the upstream
    /// lookups fail, well-known destinations are served from the static
    /// table instead.
    pub async fn destination_details(
        &self,
        destination: &Destination,
    ) -> Result<DestinationDetails> {
        let cache_key = format!(
            "details:{}:{}:{}",
            destination.name, destination.latitude, destination.longitude
        );
        if let Some(cached) = self.details_cache.get(&cache_key).await {
            debug!("serving cached details for {:?}", destination.name);
            return Ok(cached);
        }

        let wiki = self.wiki.summary(&destination.name).await;

        self.limiter.acquire().await;
        let location = match self
            .geocode
            .reverse(destination.latitude, destination.longitude)
            .await
        {
            Ok(location) => location,
            Err(err) => {
                let Some(known) = known_destination(&destination.name) else {
                    return Err(err);
                };
                warn!(
                    "location lookup for {:?} failed ({}), serving static briefing",
                    destination.name, err
                );
                let image = self
                    .photos
                    .random_photo(&format!("{} landmark", destination.name))
                    .await;
                return Ok(DestinationDetails {
                    name: destination.name.clone(),
                    latitude: destination.latitude,
                    longitude: destination.longitude,
                    description: known.description.to_string(),
                    details: known.details.to_string(),
                    image: Some(image.url),
                    address: None,
                    administrative_area: None,
                    country: None,
                    country_code: None,
                    currency: None,
                });
            }
        };

        let briefing = self.briefing(&destination.name, &location).await;

        let country = location.address.country.clone();
        let country_code = location
            .address
            .country_code
            .as_deref()
            .map(str::to_uppercase);
        let image = match wiki.as_ref().and_then(|w| w.image.clone()) {
            Some(url) => url,
            None => {
                let query = format!(
                    "{} {} city",
                    destination.name,
                    country.as_deref().unwrap_or_default()
                );
                self.photos.random_photo(query.trim()).await.url
            }
        };

        let details = DestinationDetails {
            name: destination.name.clone(),
            latitude: destination.latitude,
            longitude: destination.longitude,
            description: wiki.map(|w| w.summary).unwrap_or_default(),
            details: briefing,
            image: Some(image),
            address: Some(location.display_name.clone()),
            administrative_area: location.administrative_area().map(String::from),
            currency: country_code.as_deref().and_then(currency_for_country),
            country,
            country_code,
        };

        self.details_cache.insert(cache_key, details.clone()).await;
        Ok(details)
    }

    /// Attraction guide for a destination name. Well-known destinations
    /// are served from the static table without network calls.
    pub async fn attractions(&self, destination: &str) -> Result<Attractions> {
        if let Some(known) = known_destination(destination) {
            return Ok(Attractions {
                places: Vec::new(),
                details: known.attractions.to_string(),
            });
        }

        self.limiter.acquire().await;
        let tourist = self
            .geocode
            .search(&format!("tourist attractions in {}", destination), SEARCH_LIMIT)
            .await?;
        self.limiter.acquire().await;
        let popular = self
            .geocode
            .search(&format!("popular places in {}", destination), SEARCH_LIMIT)
            .await?;

        let mut places: Vec<GeocodeHit> = Vec::new();
        for hit in tourist.into_iter().chain(popular) {
            if !places.iter().any(|p| p.display_name == hit.display_name) {
                places.push(hit);
            }
        }

        let listing = places
            .iter()
            .map(|p| p.display_name.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "List and describe the top attractions in {}. Include tips, recommendations, and interesting facts about each attraction.\n\n\
             Known attractions:\n{}",
            destination, listing
        );
        let reply = self
            .assistant
            .send_message(
                &[
                    ChatMessage::system(GUIDE_SYSTEM_PROMPT),
                    ChatMessage::user(prompt),
                ],
                &ChatOptions {
                    max_tokens: 2000,
                    ..ChatOptions::default()
                },
            )
            .await;

        Ok(Attractions {
            places,
            details: reply.content,
        })
    }

    async fn briefing(&self, name: &str, location: &ReverseResult) -> String {
        let prompt = format!(
            "Give me detailed information about {}, {} as a travel destination.\n\
             Include the following information in a structured format:\n\
             - Best time to visit\n\
             - Popular attractions and activities\n\
             - Local cuisine and food recommendations\n\
             - Transportation tips\n\
             - Cultural highlights and customs\n\
             - Estimated daily budget (in USD)\n\
             - Safety tips\n\
             - Local weather and climate",
            name,
            location.address.country.as_deref().unwrap_or_default()
        );
        let reply = self
            .assistant
            .send_message(
                &[
                    ChatMessage::system(BRIEFING_SYSTEM_PROMPT),
                    ChatMessage::user(prompt),
                ],
                &ChatOptions {
                    max_tokens: 1500,
                    ..ChatOptions::default()
                },
            )
            .await;
        reply.content
    }
}

/// Basic country-to-currency mapping.
fn currency_for_country(country_code: &str) -> Option<String> {
    let currency = match country_code {
        "US" => "USD",
        "GB" => "GBP",
        "EU" => "EUR",
        "JP" => "JPY",
        "AU" => "AUD",
        "CA" => "CAD",
        _ => return None,
    };
    Some(currency.to_string())
}
