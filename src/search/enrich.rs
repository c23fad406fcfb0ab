use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::HttpError;
use crate::models::{CoworkingSpace, EventLocation, Listing, ListingInsights};
use crate::providers::{AnalysisContext, LlmProvider};
use crate::scoring::{compute_distance_km, round_to};
use crate::search::call_with_timeout;

/// Fill `distance_to_event` for every listing with coordinates.
///
/// Nothing changes when the event itself has no coordinates.
pub fn attach_distances(listings: Vec<Listing>, event: &EventLocation) -> Vec<Listing> {
    let Some(target) = event.coordinates else {
        debug!("Event {} has no coordinates, skipping distances", event.name);
        return listings;
    };

    listings
        .into_iter()
        .map(|listing| {
            let Some(origin) = listing.coordinates else {
                return listing;
            };

            let distance = compute_distance_km(origin.lat, origin.lng, target.lat, target.lng);
            if distance.is_nan() {
                warn!("Distance for listing {} is not a number", listing.id);
                return listing;
            }

            Listing {
                distance_to_event: Some(round_to(distance, 2)),
                ..listing
            }
        })
        .collect()
}

/// Ask the LLM for per-listing insights and attach them by listing id.
///
/// Listings without a matching insight are left untouched. Any LLM failure
/// fails the whole enrichment with a 502.
pub async fn enrich_with_insights(
    llm: &dyn LlmProvider,
    listings: Vec<Listing>,
    event: &EventLocation,
    coworking_spaces: &[CoworkingSpace],
    call_timeout: Option<Duration>,
) -> Result<Vec<Listing>, HttpError> {
    let context = AnalysisContext {
        event,
        coworking_spaces,
    };

    let insights = call_with_timeout(
        call_timeout,
        "listing analysis",
        llm.analyze_listings(&listings, context),
    )
    .await
    .map_err(|err| {
        HttpError::bad_gateway("Failed to enrich listings with LLM insights")
            .with_details(json!(err.to_string()))
    })?;

    let by_id: HashMap<String, ListingInsights> = insights
        .into_iter()
        .map(|insight| (insight.listing_id.clone(), insight))
        .collect();

    let enriched: Vec<Listing> = listings
        .into_iter()
        .map(|listing| match by_id.get(&listing.id).cloned() {
            Some(insight) => Listing {
                insights: Some(insight),
                ..listing
            },
            None => listing,
        })
        .collect();

    info!(
        "Attached insights to {} of {} listings",
        enriched.iter().filter(|l| l.insights.is_some()).count(),
        enriched.len()
    );
    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, CoworkingProximity, Proximity};
    use crate::providers::testing::StubLlmProvider;

    fn event(coordinates: Option<Coordinates>) -> EventLocation {
        EventLocation {
            name: "Web Summit".to_string(),
            coordinates,
        }
    }

    fn insight(listing_id: &str) -> ListingInsights {
        ListingInsights {
            listing_id: listing_id.to_string(),
            area_safety: "Safe, busy streets".to_string(),
            event_proximity: Proximity {
                description: "15 minute metro ride".to_string(),
                distance_km: Some(3.2),
            },
            coworking_proximity: CoworkingProximity {
                name: Some("Heden".to_string()),
                description: "Around the corner".to_string(),
                distance_km: Some(0.3),
            },
            caveats: None,
        }
    }

    fn space() -> CoworkingSpace {
        CoworkingSpace {
            name: "Heden".to_string(),
            coordinates: Coordinates::new(38.71, -9.14),
            description: None,
        }
    }

    #[test]
    fn distances_only_for_listings_with_coordinates() {
        let listings = vec![
            Listing::new("1", "Loft", "Lisbon", 100.0, 2).with_coordinates(38.7223, -9.1393),
            Listing::new("2", "Flat", "Lisbon", 90.0, 2),
        ];

        let out = attach_distances(listings, &event(Some(Coordinates::new(38.7223, -9.1393))));
        assert_eq!(out[0].distance_to_event, Some(0.0));
        assert_eq!(out[1].distance_to_event, None);
    }

    #[test]
    fn distance_is_rounded_to_two_places() {
        let listings = vec![Listing::new("1", "Loft", "Lisbon", 100.0, 2)
            .with_coordinates(38.7223, -9.1393)];

        let out = attach_distances(listings, &event(Some(Coordinates::new(38.7685, -9.0947))));
        let distance = out[0].distance_to_event.unwrap();
        assert_eq!(distance, round_to(distance, 2));
        assert!(distance > 5.0 && distance < 8.0, "got {distance}");
    }

    #[test]
    fn event_without_coordinates_is_a_no_op() {
        let mut listing = Listing::new("1", "Loft", "Lisbon", 100.0, 2).with_coordinates(38.7, -9.1);
        listing.distance_to_event = Some(4.0);

        let out = attach_distances(vec![listing.clone()], &event(None));
        assert_eq!(out, vec![listing]);
    }

    #[tokio::test]
    async fn insights_matched_by_id() {
        let llm = StubLlmProvider::new().with_insights(vec![insight("2"), insight("99")]);
        let listings = vec![
            Listing::new("1", "Loft", "Lisbon", 100.0, 2),
            Listing::new("2", "Flat", "Lisbon", 90.0, 2),
        ];

        let out = enrich_with_insights(&llm, listings, &event(None), &[space()], None)
            .await
            .unwrap();

        assert!(out[0].insights.is_none());
        assert_eq!(out[1].insights.as_ref().unwrap().listing_id, "2");
        assert_eq!(llm.analyze_calls(), 1);
    }

    #[tokio::test]
    async fn llm_failure_is_a_bad_gateway() {
        let llm = StubLlmProvider::new().with_insights_error("model overloaded");
        let listings = vec![Listing::new("1", "Loft", "Lisbon", 100.0, 2)];

        let err = enrich_with_insights(&llm, listings, &event(None), &[space()], None)
            .await
            .unwrap_err();

        assert_eq!(err.status_code, 502);
        assert_eq!(err.message, "Failed to enrich listings with LLM insights");
        assert_eq!(err.details, Some(json!("model overloaded")));
    }
}
