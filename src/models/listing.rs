use serde::{Deserialize, Serialize};

/// A point on the map
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Event the travelers want to stay close to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLocation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Coworking space near a destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoworkingSpace {
    pub name: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Proximity {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoworkingProximity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Narrative insights produced by the LLM for a single listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingInsights {
    pub listing_id: String,
    pub area_safety: String,
    pub event_proximity: Proximity,
    pub coworking_proximity: CoworkingProximity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveats: Option<String>,
}

/// Lodging listing as returned by a booking provider.
///
/// `safety_score` and `workspace_score` are on a 0-10 scale. Providers that
/// cannot score a listing leave them at zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub price: f64,
    pub bedrooms: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_count: Option<u32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub safety_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_to_event: Option<f64>,
    #[serde(default)]
    pub workspace_score: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<ListingInsights>,
}

impl Listing {
    /// Minimal listing with only the fields every provider must supply
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        price: f64,
        bedrooms: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            link: None,
            city: city.into(),
            neighborhood: None,
            coordinates: None,
            price,
            bedrooms,
            rating: None,
            reviews_count: None,
            images: Vec::new(),
            safety_score: 0.0,
            distance_to_event: None,
            workspace_score: 0.0,
            amenities: Vec::new(),
            insights: None,
        }
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates::new(lat, lng));
        self
    }
}

/// LLM verdict on how safe a listing's area is (0-100)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetyEvaluation {
    pub safety_score: u8,
    pub reason: String,
}
