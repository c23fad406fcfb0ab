use crate::models::{BookingDetails, BookingResult, BookingStatus, Listing, SearchCriteria};
use crate::providers::traits::BookingProvider;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Offline booking provider used when no search API key is configured
#[derive(Debug, Clone, Default)]
pub struct MockBookingProvider;

impl MockBookingProvider {
    pub fn new() -> Self {
        Self
    }

    /// Typical hacker-house listings placed in the requested city.
    ///
    /// They carry placeholder event distances instead of coordinates, so they
    /// stay plausible for any city.
    fn mock_listings(&self, city: &str) -> Vec<Listing> {
        info!("📋 Generating mock hacker-house listings for {}", city);

        vec![
            Listing {
                description: Some("Open-plan loft with a dedicated work room".to_string()),
                neighborhood: Some("Downtown".to_string()),
                safety_score: 9.5,
                distance_to_event: Some(0.5),
                workspace_score: 10.0,
                amenities: vec![
                    "High-speed Wifi".to_string(),
                    "Coworking Space".to_string(),
                    "Coffee Machine".to_string(),
                ],
                ..Listing::new("mock_1", "Hacker Haven Downtown", city, 150.0, 3)
            },
            Listing {
                description: Some("Quiet flat with desks and external monitors".to_string()),
                neighborhood: Some("Old Town".to_string()),
                safety_score: 8.8,
                distance_to_event: Some(2.0),
                workspace_score: 9.0,
                amenities: vec![
                    "Wifi".to_string(),
                    "Desk".to_string(),
                    "Monitor".to_string(),
                ],
                ..Listing::new("mock_2", "Coder's Retreat", city, 120.0, 2)
            },
            Listing {
                description: Some("Shared dorm-style house for larger teams".to_string()),
                safety_score: 7.5,
                distance_to_event: Some(5.0),
                workspace_score: 7.0,
                amenities: vec!["Wifi".to_string(), "Shared Workspace".to_string()],
                ..Listing::new("mock_3", "Budget Dev Dorm", city, 80.0, 4)
            },
        ]
    }
}

#[async_trait]
impl BookingProvider for MockBookingProvider {
    async fn search_listings(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>> {
        let filters = criteria.filters.clone().unwrap_or_default();

        let listings: Vec<Listing> = self
            .mock_listings(&criteria.city)
            .into_iter()
            .filter(|listing| listing.bedrooms >= criteria.bedrooms)
            .filter(|listing| filters.min_price.map_or(true, |min| listing.price >= min))
            .filter(|listing| filters.max_price.map_or(true, |max| listing.price <= max))
            .collect();

        info!("Mock provider returning {} listings", listings.len());
        Ok(listings)
    }

    async fn create_booking(&self, details: BookingDetails) -> Result<BookingResult> {
        info!("Creating mock booking for listing {}", details.listing_id);

        Ok(BookingResult {
            booking_id: format!("mock_{}", uuid::Uuid::new_v4().simple()),
            status: BookingStatus::Confirmed,
            details,
        })
    }

    fn provider_name(&self) -> &'static str {
        "Mock"
    }
}
