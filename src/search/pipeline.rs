use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{Coordinates, EventLocation, Listing, SafetyEvaluation, SearchCriteria};
use crate::providers::LlmProvider;
use crate::scoring::{
    compute_distance_km, compute_overall_score, mock_coworking_distance_km, round_to,
    score_proximity_by_distance, AspectInputs,
};
use crate::search::call_with_timeout;
use crate::search::ranking::sort_by_overall;

const MAX_SCORE: u8 = 100;

/// Per-listing scores on a 0-100 scale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingAspectScores {
    pub overall: u8,
    pub safety: u8,
    pub coworking_proximity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_proximity: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredListing {
    pub listing: Listing,
    pub scores: ListingAspectScores,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub scored_listings: Vec<ScoredListing>,
    pub overall_rating: u8,
}

/// Score every listing for safety, coworking and event proximity, then rank.
///
/// Safety evaluations are issued concurrently and the pipeline fails as a
/// whole if any one of them fails.
pub async fn evaluate_listings_pipeline(
    llm: &dyn LlmProvider,
    listings: Vec<Listing>,
    criteria: &SearchCriteria,
    event: Option<&EventLocation>,
    call_timeout: Option<Duration>,
) -> Result<PipelineOutcome> {
    if listings.is_empty() {
        return Ok(PipelineOutcome {
            scored_listings: Vec::new(),
            overall_rating: 0,
        });
    }

    info!("Evaluating safety for {} listings in {}", listings.len(), criteria.city);
    let evaluations: Vec<SafetyEvaluation> = try_join_all(listings.iter().map(|listing| {
        call_with_timeout(call_timeout, "safety evaluation", llm.evaluate_safety(listing))
    }))
    .await?;

    let event_coordinates = event.and_then(|event| event.coordinates);

    let mut scored_listings: Vec<ScoredListing> = listings
        .into_iter()
        .zip(evaluations)
        .map(|(listing, evaluation)| score_listing(listing, &evaluation, event_coordinates))
        .collect();

    let total: u32 = scored_listings
        .iter()
        .map(|scored| u32::from(scored.scores.overall))
        .sum();
    let overall_rating = (f64::from(total) / scored_listings.len() as f64).round() as u8;

    sort_by_overall(&mut scored_listings);

    debug!(overall_rating, "Pipeline finished");
    Ok(PipelineOutcome {
        scored_listings,
        overall_rating,
    })
}

fn score_listing(
    listing: Listing,
    evaluation: &SafetyEvaluation,
    event_coordinates: Option<Coordinates>,
) -> ScoredListing {
    // providers other than OpenAI do not bound the score
    let safety = evaluation.safety_score.min(MAX_SCORE);
    if safety != evaluation.safety_score {
        warn!(
            listing_id = %listing.id,
            safety_score = evaluation.safety_score,
            "Safety score above 100, clamping"
        );
    }

    let coworking_proximity = score_proximity_by_distance(mock_coworking_distance_km(&listing));

    let event_distance_km = match (event_coordinates, listing.coordinates) {
        (Some(target), Some(origin)) => Some(compute_distance_km(
            origin.lat, origin.lng, target.lat, target.lng,
        )),
        _ => None,
    }
    .filter(|km| !km.is_nan());
    let event_proximity = event_distance_km.map(score_proximity_by_distance);

    // overall uses the raw 0-100 safety score, not the 0-10 listing field
    let overall = compute_overall_score(AspectInputs {
        safety,
        coworking_proximity,
        event_proximity,
    });

    let listing = Listing {
        safety_score: round_to(f64::from(safety) / 10.0, 1),
        workspace_score: round_to(f64::from(coworking_proximity) / 10.0, 1),
        distance_to_event: event_distance_km
            .map(|km| round_to(km, 2))
            .or(listing.distance_to_event),
        ..listing
    };

    ScoredListing {
        listing,
        scores: ListingAspectScores {
            overall,
            safety,
            coworking_proximity,
            event_proximity,
        },
    }
}
