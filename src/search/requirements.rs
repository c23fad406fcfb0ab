use chrono::{Duration as ChronoDuration, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::HttpError;
use crate::models::{SearchCriteria, SearchFilters, TravelRequirements};
use crate::providers::LlmProvider;
use crate::search::call_with_timeout;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Turn LLM-derived requirements into strict search criteria
pub fn derive_search_criteria(requirements: &TravelRequirements) -> Result<SearchCriteria, HttpError> {
    let destination = &requirements.destination;
    let city = [
        destination.city.as_deref(),
        destination.region.as_deref(),
        destination.country.as_deref(),
        Some(destination.raw_text.as_str()),
    ]
    .into_iter()
    .flatten()
    .find(|candidate| !candidate.is_empty())
    .ok_or_else(|| HttpError::bad_request("Destination city is required"))?;

    let (check_in_date, check_out_date) = derive_dates(requirements)
        .ok_or_else(|| HttpError::bad_request("Check-in and check-out dates are required"))?;

    // zero travelers counts as not given
    let traveler_count = requirements
        .travelers
        .count
        .filter(|count| *count != 0)
        .ok_or_else(|| HttpError::bad_request("Traveler count is required to determine bedrooms"))?;

    // ceil(travelers / 2), at least one
    let half = traveler_count / 2 + traveler_count % 2;
    let bedrooms = u32::try_from(half.max(1)).unwrap_or(u32::MAX);

    let filters = requirements
        .budget
        .as_ref()
        .and_then(|budget| budget.amount)
        .filter(|amount| *amount != 0.0)
        .map(|amount| SearchFilters {
            max_price: Some(amount),
            ..Default::default()
        });

    Ok(SearchCriteria {
        filters,
        ..SearchCriteria::new(city, check_in_date, check_out_date, bedrooms)
    })
}

/// Explicit dates win; a single boundary is completed from `durationDays`
fn derive_dates(requirements: &TravelRequirements) -> Option<(NaiveDate, NaiveDate)> {
    let dates = &requirements.dates;
    let duration = dates
        .duration_days
        .filter(|days| *days != 0.0 && days.is_finite())
        .and_then(|days| ChronoDuration::try_days(days.trunc() as i64));

    match (dates.start_date, dates.end_date, duration) {
        (Some(start), Some(end), _) => Some((start, end)),
        (Some(start), None, Some(duration)) => Some((start, start.checked_add_signed(duration)?)),
        (None, Some(end), Some(duration)) => Some((end.checked_sub_signed(duration)?, end)),
        _ => None,
    }
}

/// Outcome of one attempt at getting usable requirements from the LLM
enum Attempt {
    Accepted(TravelRequirements),
    Rejected(HttpError),
}

/// Bounded retry around `LlmProvider::parse_requirements` with shape validation
#[derive(Debug, Clone, Copy)]
pub struct RequirementsRetryPolicy {
    pub max_attempts: u32,
    pub call_timeout: Option<Duration>,
}

impl Default for RequirementsRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            call_timeout: None,
        }
    }
}

impl RequirementsRetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    pub async fn parse(
        &self,
        llm: &dyn LlmProvider,
        message: &str,
    ) -> Result<TravelRequirements, HttpError> {
        for attempt in 1..=self.max_attempts {
            match self.attempt(llm, message).await {
                Attempt::Accepted(requirements) => {
                    info!(attempt, "Requirements parsed");
                    return Ok(requirements);
                }
                Attempt::Rejected(err) if attempt == self.max_attempts => return Err(err),
                Attempt::Rejected(err) => {
                    warn!(attempt, error = %err, "Requirements attempt rejected, retrying");
                }
            }
        }

        Err(HttpError::bad_gateway("Failed to derive requirements from LLM"))
    }

    async fn attempt(&self, llm: &dyn LlmProvider, message: &str) -> Attempt {
        let payload = match call_with_timeout(
            self.call_timeout,
            "requirements parsing",
            llm.parse_requirements(message),
        )
        .await
        {
            Ok(payload) => payload,
            Err(err) => {
                return Attempt::Rejected(
                    HttpError::bad_gateway("LLM unavailable").with_details(json!(err.to_string())),
                )
            }
        };

        match validate_requirements(&payload) {
            Ok(requirements) => Attempt::Accepted(requirements),
            Err(validation_error) => {
                debug!(error = %validation_error, "LLM requirements failed validation");
                Attempt::Rejected(HttpError::bad_gateway("LLM response invalid").with_details(
                    json!({
                        "llmResponse": payload,
                        "validationErrors": [validation_error],
                    }),
                ))
            }
        }
    }
}

/// Schema boundary for untrusted LLM output
pub fn validate_requirements(payload: &Value) -> Result<TravelRequirements, String> {
    TravelRequirements::deserialize(payload).map_err(|err| err.to_string())
}
