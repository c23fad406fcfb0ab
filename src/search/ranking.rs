use std::cmp::Ordering;

use crate::models::Listing;
use crate::search::pipeline::ScoredListing;

/// Distance used for listings whose distance to the event is unknown
const UNKNOWN_DISTANCE_KM: f64 = f64::MAX;

/// Plain-criteria ordering: safest first, then closest to the event, then
/// most bedrooms, cheapest, and best workspace.
pub fn compare_listings(a: &Listing, b: &Listing) -> Ordering {
    let distance = |listing: &Listing| listing.distance_to_event.unwrap_or(UNKNOWN_DISTANCE_KM);

    b.safety_score
        .total_cmp(&a.safety_score)
        .then_with(|| distance(a).total_cmp(&distance(b)))
        .then_with(|| b.bedrooms.cmp(&a.bedrooms))
        .then_with(|| a.price.total_cmp(&b.price))
        .then_with(|| b.workspace_score.total_cmp(&a.workspace_score))
}

pub fn sort_listings(listings: &mut [Listing]) {
    listings.sort_by(compare_listings);
}

/// Scored ordering: highest overall score first, ties keep input order
pub fn sort_by_overall(scored: &mut [ScoredListing]) {
    scored.sort_by(|a, b| b.scores.overall.cmp(&a.scores.overall));
}
