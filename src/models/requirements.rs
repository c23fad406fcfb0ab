use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where the travelers want to go, as loosely as they described it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub raw_text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelDates {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub rough_window: Option<String>,
    #[serde(default)]
    pub duration_days: Option<f64>,
    pub is_flexible: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Travelers {
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub room_preferences: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub per_person: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceNeeds {
    pub needs: Vec<String>,
    #[serde(default)]
    pub wifi: Option<bool>,
    #[serde(default)]
    pub coworking: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConstraintKind {
    Hard,
    Soft,
    Commonsense,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Constraint {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
}

/// Travel request as understood by the LLM.
///
/// Deserializing into this type is the validation boundary for LLM output:
/// required fields, date formats and integer traveler counts are all enforced
/// by serde.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequirements {
    pub destination: Destination,
    pub dates: TravelDates,
    pub travelers: Travelers,
    #[serde(default)]
    pub budget: Option<Budget>,
    pub workspace: WorkspaceNeeds,
    pub vibe: Vec<String>,
    pub constraints: Vec<Constraint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_typical_llm_payload() {
        let payload = json!({
            "destination": { "city": "Lisbon", "country": "Portugal", "rawText": "Lisbon" },
            "dates": { "startDate": "2025-05-01", "durationDays": 6, "isFlexible": false },
            "travelers": { "count": 6 },
            "budget": { "amount": 200, "currency": "USD", "perPerson": false },
            "workspace": { "needs": ["strong wifi"], "wifi": true },
            "vibe": ["beach"],
            "constraints": [{ "description": "Must have strong wifi", "type": "HARD" }]
        });

        let requirements: TravelRequirements = serde_json::from_value(payload).unwrap();
        assert_eq!(requirements.destination.city.as_deref(), Some("Lisbon"));
        assert_eq!(requirements.dates.duration_days, Some(6.0));
        assert_eq!(requirements.travelers.count, Some(6));
        assert_eq!(requirements.constraints[0].kind, ConstraintKind::Hard);
    }

    #[test]
    fn rejects_malformed_dates_and_fractional_travelers() {
        let bad_date = json!({
            "destination": { "rawText": "Lisbon" },
            "dates": { "startDate": "May 1st", "isFlexible": true },
            "travelers": {},
            "workspace": { "needs": [] },
            "vibe": [],
            "constraints": []
        });
        assert!(serde_json::from_value::<TravelRequirements>(bad_date).is_err());

        let fractional = json!({
            "destination": { "rawText": "Lisbon" },
            "dates": { "isFlexible": true },
            "travelers": { "count": 2.5 },
            "workspace": { "needs": [] },
            "vibe": [],
            "constraints": []
        });
        assert!(serde_json::from_value::<TravelRequirements>(fractional).is_err());
    }
}
