use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{HttpError, Result};
use crate::models::{EventLocation, Listing, SearchCriteria};
use crate::providers::{BookingProvider, LlmProvider};
use crate::search::anchors::{AnchorConfig, AnchorResolver};
use crate::search::call_with_timeout;
use crate::search::enrich::{attach_distances, enrich_with_insights};
use crate::search::pipeline::{evaluate_listings_pipeline, ScoredListing};
use crate::search::ranking::sort_listings;
use crate::search::requirements::{derive_search_criteria, RequirementsRetryPolicy};

/// Result of a free-text (LLM-driven) search
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageSearchOutcome {
    pub derived_criteria: SearchCriteria,
    pub overall_rating: u8,
    pub results: Vec<ScoredListing>,
}

/// Result of a structured-criteria search
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaSearchOutcome {
    pub derived_criteria: SearchCriteria,
    pub listings: Vec<Listing>,
}

/// Finds, scores and ranks lodging for a travel request
pub struct SearchListingsUseCase {
    booking: Arc<dyn BookingProvider>,
    llm: Arc<dyn LlmProvider>,
    anchors: AnchorResolver,
    retry: RequirementsRetryPolicy,
    call_timeout: Option<Duration>,
}

impl SearchListingsUseCase {
    pub fn new(
        booking: Arc<dyn BookingProvider>,
        llm: Arc<dyn LlmProvider>,
        anchors: Arc<AnchorConfig>,
    ) -> Self {
        Self {
            booking,
            llm,
            anchors: AnchorResolver::new(anchors),
            retry: RequirementsRetryPolicy::default(),
            call_timeout: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.retry.max_attempts = max_attempts;
        self
    }

    /// Bound every booking and LLM call
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self.retry = self.retry.with_call_timeout(timeout);
        self
    }

    /// Parse a free-text request with the LLM, then search and score listings.
    ///
    /// Flow:
    /// 1. Parse the message into travel requirements (with retry).
    /// 2. Derive strict search criteria.
    /// 3. Search listings via the booking provider.
    /// 4. Score safety, coworking and optional event proximity per listing.
    pub async fn search_from_message(
        &self,
        message: &str,
        event: Option<&EventLocation>,
    ) -> Result<MessageSearchOutcome> {
        if message.is_empty() {
            return Err(HttpError::bad_request("Message is required").into());
        }

        let requirements = self.retry.parse(self.llm.as_ref(), message).await?;
        let criteria = derive_search_criteria(&requirements)?;
        criteria.validate()?;
        info!(
            city = %criteria.city,
            check_in = %criteria.check_in_date,
            check_out = %criteria.check_out_date,
            bedrooms = criteria.bedrooms,
            "Derived search criteria"
        );

        let listings = self.fetch_listings(&criteria).await?;

        let outcome = evaluate_listings_pipeline(
            self.llm.as_ref(),
            listings,
            &criteria,
            event,
            self.call_timeout,
        )
        .await?;

        info!(
            "✅ Scored {} listings, overall rating {}",
            outcome.scored_listings.len(),
            outcome.overall_rating
        );

        Ok(MessageSearchOutcome {
            derived_criteria: criteria,
            overall_rating: outcome.overall_rating,
            results: outcome.scored_listings,
        })
    }

    /// Search with structured criteria; event and coworking enrichment is
    /// applied only when anchors can be resolved.
    pub async fn search_from_criteria(&self, criteria: SearchCriteria) -> Result<CriteriaSearchOutcome> {
        criteria.validate()?;

        let event = self.anchors.try_resolve_event(&criteria);
        let coworking_spaces = self.anchors.try_resolve_coworking_spaces(&criteria);

        let mut listings = self.fetch_listings(&criteria).await?;

        if let Some(event) = &event {
            listings = attach_distances(listings, event);

            if !coworking_spaces.is_empty() {
                listings = enrich_with_insights(
                    self.llm.as_ref(),
                    listings,
                    event,
                    &coworking_spaces,
                    self.call_timeout,
                )
                .await?;
            }
        } else {
            info!("No event anchor for {}, skipping enrichment", criteria.city);
        }

        sort_listings(&mut listings);

        Ok(CriteriaSearchOutcome {
            derived_criteria: criteria,
            listings,
        })
    }

    async fn fetch_listings(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>> {
        let listings = call_with_timeout(
            self.call_timeout,
            "listing search",
            self.booking.search_listings(criteria),
        )
        .await
        .map_err(|err| {
            warn!(provider = self.booking.provider_name(), error = %err, "Listing search failed");
            err
        })?;

        info!(
            "Found {} listings via {}",
            listings.len(),
            self.booking.provider_name()
        );
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::models::{Coordinates, CoworkingProximity, CoworkingSpace, ListingInsights, Proximity};
    use crate::providers::testing::{StubBookingProvider, StubLlmProvider};
    use chrono::NaiveDate;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn lisbon_criteria() -> SearchCriteria {
        SearchCriteria::new("Lisbon", date("2025-05-01"), date("2025-05-07"), 2)
    }

    fn lisbon_anchors() -> Arc<AnchorConfig> {
        Arc::new(
            AnchorConfig::default()
                .with_event(
                    "lisbon",
                    EventLocation {
                        name: "Web Summit".to_string(),
                        coordinates: Some(Coordinates::new(38.7685, -9.0947)),
                    },
                )
                .with_coworking(
                    "lisbon",
                    vec![CoworkingSpace {
                        name: "Second Home Lisboa".to_string(),
                        coordinates: Coordinates::new(38.7077, -9.1465),
                        description: Some("Hip coworking space with strong wifi".to_string()),
                    }],
                ),
        )
    }

    fn insight(listing_id: &str) -> ListingInsights {
        ListingInsights {
            listing_id: listing_id.to_string(),
            area_safety: "Very safe, well-lit streets".to_string(),
            event_proximity: Proximity {
                description: "Short metro ride".to_string(),
                distance_km: Some(6.4),
            },
            coworking_proximity: CoworkingProximity {
                name: Some("Second Home Lisboa".to_string()),
                description: "Ten minute walk".to_string(),
                distance_km: Some(0.9),
            },
            caveats: Some("Noise at night".to_string()),
        }
    }

    fn use_case(
        booking: Arc<StubBookingProvider>,
        llm: Arc<StubLlmProvider>,
        anchors: Arc<AnchorConfig>,
    ) -> SearchListingsUseCase {
        SearchListingsUseCase::new(booking, llm, anchors)
    }

    #[tokio::test]
    async fn criteria_search_enriches_with_anchors() {
        let booking = Arc::new(StubBookingProvider::new(vec![
            Listing::new("1", "Alfama Loft", "Lisbon", 150.0, 2).with_coordinates(38.7223, -9.1393),
        ]));
        let llm = Arc::new(StubLlmProvider::new().with_insights(vec![insight("1")]));

        let outcome = use_case(booking.clone(), llm.clone(), lisbon_anchors())
            .search_from_criteria(lisbon_criteria())
            .await
            .unwrap();

        let listing = &outcome.listings[0];
        assert!(listing.distance_to_event.unwrap() > 0.0);
        assert_eq!(listing.insights.as_ref().unwrap().area_safety, "Very safe, well-lit streets");
        assert_eq!(llm.analyze_calls(), 1);
        assert_eq!(booking.searches().len(), 1);
    }

    #[tokio::test]
    async fn criteria_search_without_anchors_skips_llm() {
        let booking = Arc::new(StubBookingProvider::new(vec![
            Listing::new("1", "Loft", "Berlin", 150.0, 2).with_coordinates(52.52, 13.40),
        ]));
        let llm = Arc::new(StubLlmProvider::new());

        let mut criteria = lisbon_criteria();
        criteria.city = "Berlin".to_string();

        let outcome = use_case(booking, llm.clone(), lisbon_anchors())
            .search_from_criteria(criteria)
            .await
            .unwrap();

        assert!(outcome.listings[0].distance_to_event.is_none());
        assert_eq!(llm.analyze_calls(), 0);
        assert_eq!(outcome.derived_criteria.city, "Berlin");
    }

    #[tokio::test]
    async fn event_without_coworking_attaches_distances_only() {
        let booking = Arc::new(StubBookingProvider::new(vec![
            Listing::new("1", "Loft", "Porto", 150.0, 2).with_coordinates(41.15, -8.61),
        ]));
        let llm = Arc::new(StubLlmProvider::new());

        let mut criteria = lisbon_criteria();
        criteria.city = "Porto".to_string();
        criteria.events = Some(vec![EventLocation {
            name: "Porto Tech Hub".to_string(),
            coordinates: Some(Coordinates::new(41.15, -8.61)),
        }]);

        let outcome = use_case(booking, llm.clone(), lisbon_anchors())
            .search_from_criteria(criteria)
            .await
            .unwrap();

        assert_eq!(outcome.listings[0].distance_to_event, Some(0.0));
        assert_eq!(llm.analyze_calls(), 0);
    }

    #[tokio::test]
    async fn failed_enrichment_surfaces_bad_gateway() {
        let booking = Arc::new(StubBookingProvider::new(vec![Listing::new(
            "1", "Loft", "Lisbon", 150.0, 2,
        )]));
        let llm = Arc::new(StubLlmProvider::new().with_insights_error("timeout"));

        let err = use_case(booking, llm, lisbon_anchors())
            .search_from_criteria(lisbon_criteria())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 502);
        assert_eq!(err.to_body().error, "Failed to enrich listings with LLM insights");
    }

    #[tokio::test]
    async fn reversed_dates_never_reach_the_provider() {
        let booking = Arc::new(StubBookingProvider::new(Vec::new()));
        let llm = Arc::new(StubLlmProvider::new());

        let criteria = SearchCriteria::new("Lisbon", date("2025-05-07"), date("2025-05-01"), 2);
        let err = use_case(booking.clone(), llm, lisbon_anchors())
            .search_from_criteria(criteria)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
        assert!(booking.searches().is_empty());
    }

    #[tokio::test]
    async fn empty_message_is_rejected_before_llm() {
        let booking = Arc::new(StubBookingProvider::new(Vec::new()));
        let llm = Arc::new(StubLlmProvider::new());

        let err = use_case(booking, llm.clone(), lisbon_anchors())
            .search_from_message("", None)
            .await
            .unwrap_err();

        assert!(matches!(&err, SearchError::Http(e) if e.message == "Message is required"));
        assert_eq!(err.status_code(), 400);
        assert_eq!(llm.parse_calls(), 0);
    }

    #[tokio::test]
    async fn message_search_scores_and_ranks() {
        let booking = Arc::new(StubBookingProvider::new(vec![
            Listing::new("far", "Far", "Lisbon", 90.0, 3),
            Listing::new("near", "Near", "Lisbon", 150.0, 3).with_coordinates(38.7685, -9.0947),
        ]));
        let llm = Arc::new(
            StubLlmProvider::new()
                .with_requirements(json!({
                    "destination": { "city": "Lisbon", "rawText": "Lisbon" },
                    "dates": { "startDate": "2025-05-01", "durationDays": 6, "isFlexible": false },
                    "travelers": { "count": 5 },
                    "budget": { "amount": 200 },
                    "workspace": { "needs": ["wifi"] },
                    "vibe": [],
                    "constraints": []
                }))
                .with_default_safety_score(90),
        );
        let event = EventLocation {
            name: "Web Summit".to_string(),
            coordinates: Some(Coordinates::new(38.7685, -9.0947)),
        };

        let outcome = use_case(booking.clone(), llm.clone(), lisbon_anchors())
            .search_from_message("5 of us, Lisbon, May 1st for 6 days", Some(&event))
            .await
            .unwrap();

        assert_eq!(outcome.derived_criteria.bedrooms, 3);
        assert_eq!(outcome.derived_criteria.check_out_date, date("2025-05-07"));
        assert_eq!(
            outcome.derived_criteria.filters.as_ref().unwrap().max_price,
            Some(200.0)
        );
        assert_eq!(outcome.results[0].listing.id, "near");
        assert_eq!(outcome.results[0].scores.event_proximity, Some(100));
        assert_eq!(outcome.results[1].scores.event_proximity, None);
        assert_eq!(llm.safety_calls(), 2);
        assert_eq!(booking.searches()[0].city, "Lisbon");
    }

    #[tokio::test]
    async fn booking_failure_is_unclassified() {
        let booking = Arc::new(StubBookingProvider::failing("upstream 503"));
        let llm = Arc::new(StubLlmProvider::new());

        let err = use_case(booking, llm, lisbon_anchors())
            .search_from_criteria(lisbon_criteria())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_body().error, "Internal Server Error");
    }

    #[tokio::test]
    async fn slow_enrichment_times_out_as_bad_gateway() {
        let booking = Arc::new(StubBookingProvider::new(vec![Listing::new(
            "1", "Loft", "Lisbon", 150.0, 2,
        )]));
        let llm = Arc::new(
            StubLlmProvider::new()
                .with_delay(Duration::from_millis(200))
                .with_insights(vec![insight("1")]),
        );

        let err = use_case(booking, llm, lisbon_anchors())
            .with_call_timeout(Duration::from_millis(20))
            .search_from_criteria(lisbon_criteria())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 502);
    }
}
