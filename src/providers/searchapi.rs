use crate::models::{
    BookingDetails, BookingResult, BookingStatus, Coordinates, Listing, SearchCriteria,
};
use crate::providers::traits::BookingProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_SEARCHAPI_BASE_URL: &str = "https://www.searchapi.io/api/v1";

// The search API does not score listings; these keep ranking neutral until
// the scoring pipeline overwrites them.
const PLACEHOLDER_SAFETY_SCORE: f64 = 9.0;
const PLACEHOLDER_WORKSPACE_SCORE: f64 = 8.0;

/// Keys under which the search API has been seen to return its result list
const RESULT_KEYS: [&str; 4] = ["search_results", "results", "organic_results", "properties"];

/// Airbnb listings through the SearchApi.io search engine
pub struct SearchApiBookingProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SearchApiBookingProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_SEARCHAPI_BASE_URL, api_key, timeout)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn query_params(criteria: &SearchCriteria) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("engine", "airbnb".to_string()),
            ("q", criteria.city.clone()),
            ("check_in_date", criteria.check_in_date.to_string()),
            ("check_out_date", criteria.check_out_date.to_string()),
            // bedrooms stand in for adults; the API has no bedroom filter
            ("adults", criteria.bedrooms.to_string()),
            ("currency", "USD".to_string()),
        ];

        if let Some(filters) = &criteria.filters {
            if let Some(min) = filters.min_price.filter(|p| *p > 0.0) {
                params.push(("price_min", min.to_string()));
            }
            if let Some(max) = filters.max_price.filter(|p| *p > 0.0) {
                params.push(("price_max", max.to_string()));
            }
        }

        params
    }

    /// Locate the result array in whatever envelope the API returned
    fn extract_results(body: &Value) -> Vec<Value> {
        if let Some(items) = body.as_array() {
            return items.clone();
        }

        for key in RESULT_KEYS {
            if let Some(items) = body.get(key).and_then(Value::as_array) {
                return items.clone();
            }
        }

        let preview: String = body.to_string().chars().take(1000).collect();
        warn!("Unexpected search API response structure: {}", preview);
        Vec::new()
    }

    fn parse_listing(property: &Value, criteria: &SearchCriteria) -> Option<Listing> {
        let id = match property.get("id")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let name = property
            .get("title")
            .or_else(|| property.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let str_field = |key: &str| property.get(key).and_then(Value::as_str).map(str::to_string);

        let coordinates = match (
            property.get("gps_lat").and_then(Value::as_f64),
            property.get("gps_long").and_then(Value::as_f64),
        ) {
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0 => Some(Coordinates::new(lat, lng)),
            _ => None,
        };

        let price = property
            .get("price")
            .and_then(|p| {
                p.get("extracted_total_price")
                    .and_then(Value::as_f64)
                    .or_else(|| p.get("extracted_price").and_then(Value::as_f64))
            })
            .unwrap_or(0.0);

        let bedrooms = property
            .get("bedrooms")
            .and_then(Value::as_u64)
            .filter(|b| *b > 0)
            .and_then(|b| u32::try_from(b).ok())
            .unwrap_or_else(|| criteria.bedrooms.max(1));

        let strings = |key: &str| -> Vec<String> {
            property
                .get(key)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };

        Some(Listing {
            description: str_field("description"),
            link: str_field("link").or_else(|| str_field("url")),
            neighborhood: str_field("neighborhood").or_else(|| {
                property
                    .pointer("/address/neighborhood")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            }),
            coordinates,
            rating: property.get("rating").and_then(Value::as_f64),
            reviews_count: property
                .get("reviews")
                .and_then(Value::as_u64)
                .and_then(|r| u32::try_from(r).ok()),
            images: strings("images"),
            safety_score: PLACEHOLDER_SAFETY_SCORE,
            distance_to_event: property.get("extracted_distance").and_then(Value::as_f64),
            workspace_score: PLACEHOLDER_WORKSPACE_SCORE,
            amenities: strings("amenities"),
            ..Listing::new(id, name, criteria.city.clone(), price, bedrooms)
        })
    }
}

#[async_trait]
impl BookingProvider for SearchApiBookingProvider {
    async fn search_listings(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>> {
        info!("Searching Airbnb listings for {}", criteria.city);

        if self.api_key.is_empty() {
            anyhow::bail!("SEARCHAPI_IO_API_KEY is not set. Cannot query Airbnb search API.");
        }

        let url = format!("{}/search", self.base_url);
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&Self::query_params(criteria))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Failed to reach search API")?;

        if !response.status().is_success() {
            warn!("Search API returned status: {}", response.status());
            anyhow::bail!("Search API request failed: {}", response.status());
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to read search API response body")?;

        let results = Self::extract_results(&body);
        let listings: Vec<Listing> = results
            .iter()
            .filter_map(|property| Self::parse_listing(property, criteria))
            .collect();

        info!(
            "✅ Search API returned {} results, {} usable listings",
            results.len(),
            listings.len()
        );
        Ok(listings)
    }

    async fn create_booking(&self, details: BookingDetails) -> Result<BookingResult> {
        // The search API is read-only, so bookings are simulated
        info!("Creating mock booking for listing {}", details.listing_id);

        Ok(BookingResult {
            booking_id: format!("abnb_{}", uuid::Uuid::new_v4().simple()),
            status: BookingStatus::Confirmed,
            details,
        })
    }

    fn provider_name(&self) -> &'static str {
        "SearchApi Airbnb"
    }
}
