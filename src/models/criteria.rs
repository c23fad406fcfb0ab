use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::HttpError;
use crate::models::listing::{CoworkingSpace, EventLocation};

/// Optional bounds passed through to the booking provider
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_safety_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_workspace_score: Option<f64>,
}

/// Strict parameters used to query a booking provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub city: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub bedrooms: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventLocation>>,
    /// Coworking spaces supplied with the request; preferred over the anchor table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coworking_spaces: Option<Vec<CoworkingSpace>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
}

impl SearchCriteria {
    pub fn new(
        city: impl Into<String>,
        check_in_date: NaiveDate,
        check_out_date: NaiveDate,
        bedrooms: u32,
    ) -> Self {
        Self {
            city: city.into(),
            check_in_date,
            check_out_date,
            bedrooms,
            events: None,
            coworking_spaces: None,
            filters: None,
        }
    }

    /// Reject criteria a booking provider cannot meaningfully search with
    pub fn validate(&self) -> Result<(), HttpError> {
        if self.city.trim().is_empty() {
            return Err(HttpError::bad_request("City is required"));
        }
        if self.bedrooms < 1 {
            return Err(HttpError::bad_request("Bedrooms must be at least 1"));
        }
        if self.check_in_date > self.check_out_date {
            return Err(HttpError::bad_request(
                "Check-in date must not be after check-out date",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub listing_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub nights: u32,
    pub payers: Vec<String>,
    /// Share of the total per payer, in basis points
    pub bps: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingResult {
    pub booking_id: String,
    pub status: BookingStatus,
    pub details: BookingDetails,
}
