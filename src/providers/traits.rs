use crate::models::{
    BookingDetails, BookingResult, CoworkingSpace, EventLocation, Listing, ListingInsights,
    SafetyEvaluation, SearchCriteria,
};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Source of lodging listings.
/// This allows swapping the Airbnb search API for other providers (or a mock)
#[async_trait]
pub trait BookingProvider: Send + Sync {
    /// Fetch candidate listings matching the criteria
    async fn search_listings(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>>;

    /// Book a listing. Every current implementation is a stub.
    async fn create_booking(&self, details: BookingDetails) -> Result<BookingResult>;

    /// Get the name of the provider
    fn provider_name(&self) -> &'static str;
}

/// Anchors the LLM compares listings against
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub event: &'a EventLocation,
    pub coworking_spaces: &'a [CoworkingSpace],
}

/// Language model collaborator
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Turn a free-text request into requirements JSON.
    ///
    /// The payload is untrusted; callers validate it against `TravelRequirements`.
    async fn parse_requirements(&self, message: &str) -> Result<Value>;

    /// Rate how safe a listing's area is on a 0-100 scale
    async fn evaluate_safety(&self, listing: &Listing) -> Result<SafetyEvaluation>;

    /// Narrative insights per listing, keyed by listing id
    async fn analyze_listings(
        &self,
        listings: &[Listing],
        context: AnalysisContext<'_>,
    ) -> Result<Vec<ListingInsights>>;
}
