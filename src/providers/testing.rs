// Recording stubs for the booking and LLM collaborators.
//
// Responses are queued up front; every call is counted so tests can assert
// which collaborators were (or were not) contacted.

use crate::models::{
    BookingDetails, BookingResult, BookingStatus, Listing, ListingInsights, SafetyEvaluation,
    SearchCriteria,
};
use crate::providers::traits::{AnalysisContext, BookingProvider, LlmProvider};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

// =============================================================================
// Stub Booking Provider
// =============================================================================

pub struct StubBookingProvider {
    listings: Vec<Listing>,
    failure: Option<String>,
    searches: Mutex<Vec<SearchCriteria>>,
}

impl StubBookingProvider {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings,
            failure: None,
            searches: Mutex::new(Vec::new()),
        }
    }

    /// Every search fails with the given message
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    /// Criteria of every search, in call order
    pub fn searches(&self) -> Vec<SearchCriteria> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingProvider for StubBookingProvider {
    async fn search_listings(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>> {
        self.searches.lock().unwrap().push(criteria.clone());
        match &self.failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(self.listings.clone()),
        }
    }

    async fn create_booking(&self, details: BookingDetails) -> Result<BookingResult> {
        Ok(BookingResult {
            booking_id: "stub_booking".to_string(),
            status: BookingStatus::Pending,
            details,
        })
    }

    fn provider_name(&self) -> &'static str {
        "Stub"
    }
}

// =============================================================================
// Stub LLM Provider
// =============================================================================

pub struct StubLlmProvider {
    requirement_responses: Mutex<Vec<Result<Value, String>>>,
    safety_scores: HashMap<String, u8>,
    default_safety_score: u8,
    failing_safety_ids: Vec<String>,
    insights: Option<Result<Vec<ListingInsights>, String>>,
    delay: Option<Duration>,
    parse_calls: Mutex<usize>,
    safety_calls: Mutex<Vec<String>>,
    analyze_calls: Mutex<usize>,
}

impl StubLlmProvider {
    pub fn new() -> Self {
        Self {
            requirement_responses: Mutex::new(Vec::new()),
            safety_scores: HashMap::new(),
            default_safety_score: 80,
            failing_safety_ids: Vec::new(),
            insights: None,
            delay: None,
            parse_calls: Mutex::new(0),
            safety_calls: Mutex::new(Vec::new()),
            analyze_calls: Mutex::new(0),
        }
    }

    /// Queue a requirements payload for the next parse call
    pub fn with_requirements(self, payload: Value) -> Self {
        self.requirement_responses.lock().unwrap().push(Ok(payload));
        self
    }

    /// Queue a failing parse call
    pub fn with_requirements_error(self, message: &str) -> Self {
        self.requirement_responses
            .lock()
            .unwrap()
            .push(Err(message.to_string()));
        self
    }

    pub fn with_safety_score(mut self, listing_id: &str, score: u8) -> Self {
        self.safety_scores.insert(listing_id.to_string(), score);
        self
    }

    pub fn with_default_safety_score(mut self, score: u8) -> Self {
        self.default_safety_score = score;
        self
    }

    pub fn with_safety_failure(mut self, listing_id: &str) -> Self {
        self.failing_safety_ids.push(listing_id.to_string());
        self
    }

    pub fn with_insights(mut self, insights: Vec<ListingInsights>) -> Self {
        self.insights = Some(Ok(insights));
        self
    }

    pub fn with_insights_error(mut self, message: &str) -> Self {
        self.insights = Some(Err(message.to_string()));
        self
    }

    /// Delay every response, for exercising timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn parse_calls(&self) -> usize {
        *self.parse_calls.lock().unwrap()
    }

    pub fn safety_calls(&self) -> usize {
        self.safety_calls.lock().unwrap().len()
    }

    pub fn analyze_calls(&self) -> usize {
        *self.analyze_calls.lock().unwrap()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for StubLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for StubLlmProvider {
    async fn parse_requirements(&self, _message: &str) -> Result<Value> {
        *self.parse_calls.lock().unwrap() += 1;
        self.pause().await;

        let next = {
            let mut queue = self.requirement_responses.lock().unwrap();
            if queue.is_empty() {
                None
            } else {
                Some(queue.remove(0))
            }
        };

        match next {
            Some(Ok(payload)) => Ok(payload),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no requirements response queued")),
        }
    }

    async fn evaluate_safety(&self, listing: &Listing) -> Result<SafetyEvaluation> {
        self.safety_calls.lock().unwrap().push(listing.id.clone());
        self.pause().await;

        if self.failing_safety_ids.contains(&listing.id) {
            return Err(anyhow!("safety evaluation failed for {}", listing.id));
        }

        let safety_score = self
            .safety_scores
            .get(&listing.id)
            .copied()
            .unwrap_or(self.default_safety_score);

        Ok(SafetyEvaluation {
            safety_score,
            reason: format!("Stub evaluation for {}", listing.id),
        })
    }

    async fn analyze_listings(
        &self,
        _listings: &[Listing],
        _context: AnalysisContext<'_>,
    ) -> Result<Vec<ListingInsights>> {
        *self.analyze_calls.lock().unwrap() += 1;
        self.pause().await;

        match &self.insights {
            Some(Ok(insights)) => Ok(insights.clone()),
            Some(Err(message)) => Err(anyhow!(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}
