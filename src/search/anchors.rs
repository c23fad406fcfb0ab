use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::HttpError;
use crate::models::{CoworkingSpace, EventLocation, SearchCriteria};

/// Anchor table as written on disk
#[derive(Debug, Default, Deserialize)]
struct AnchorTable {
    #[serde(default)]
    events: HashMap<String, EventLocation>,
    #[serde(default)]
    coworking: HashMap<String, Vec<CoworkingSpace>>,
}

/// Static per-city events and coworking spaces.
///
/// City keys are lower-cased on construction; the table is read-only afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "AnchorTable")]
pub struct AnchorConfig {
    events: HashMap<String, EventLocation>,
    coworking: HashMap<String, Vec<CoworkingSpace>>,
}

impl From<AnchorTable> for AnchorConfig {
    fn from(table: AnchorTable) -> Self {
        Self::new(table.events, table.coworking)
    }
}

impl AnchorConfig {
    pub fn new(
        events: HashMap<String, EventLocation>,
        coworking: HashMap<String, Vec<CoworkingSpace>>,
    ) -> Self {
        Self {
            events: events
                .into_iter()
                .map(|(city, event)| (city.to_lowercase(), event))
                .collect(),
            coworking: coworking
                .into_iter()
                .map(|(city, spaces)| (city.to_lowercase(), spaces))
                .collect(),
        }
    }

    pub fn with_event(mut self, city: &str, event: EventLocation) -> Self {
        self.events.insert(city.to_lowercase(), event);
        self
    }

    pub fn with_coworking(mut self, city: &str, spaces: Vec<CoworkingSpace>) -> Self {
        self.coworking.insert(city.to_lowercase(), spaces);
        self
    }

    /// Load the table from a JSON file shaped `{ "events": {..}, "coworking": {..} }`
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read anchors file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid anchors file {}", path.display()))?;

        info!(
            "Loaded anchors for {} event cities and {} coworking cities",
            config.events.len(),
            config.coworking.len()
        );
        Ok(config)
    }

    pub fn event_for(&self, city: &str) -> Option<&EventLocation> {
        self.events.get(&city.to_lowercase())
    }

    pub fn coworking_for(&self, city: &str) -> Option<&[CoworkingSpace]> {
        self.coworking
            .get(&city.to_lowercase())
            .map(Vec::as_slice)
            .filter(|spaces| !spaces.is_empty())
    }
}

/// Picks the event and coworking anchors for a search.
///
/// Request data wins over the anchor table. The required variants fail with a
/// 400; the `try_` variants treat missing anchors as "no enrichment".
#[derive(Debug, Clone, Default)]
pub struct AnchorResolver {
    anchors: Arc<AnchorConfig>,
}

impl AnchorResolver {
    pub fn new(anchors: Arc<AnchorConfig>) -> Self {
        Self { anchors }
    }

    pub fn resolve_event(&self, criteria: &SearchCriteria) -> Result<EventLocation, HttpError> {
        self.try_resolve_event(criteria).ok_or_else(|| {
            HttpError::bad_request("Event location is required for proximity analysis")
        })
    }

    pub fn try_resolve_event(&self, criteria: &SearchCriteria) -> Option<EventLocation> {
        if let Some(event) = criteria.events.as_ref().and_then(|events| events.first()) {
            debug!("Using event {} from request", event.name);
            return Some(event.clone());
        }

        self.anchors.event_for(&criteria.city).cloned()
    }

    pub fn resolve_coworking_spaces(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<CoworkingSpace>, HttpError> {
        let spaces = self.try_resolve_coworking_spaces(criteria);
        if spaces.is_empty() {
            return Err(HttpError::bad_request(
                "Coworking spaces are required for proximity analysis",
            ));
        }
        Ok(spaces)
    }

    pub fn try_resolve_coworking_spaces(&self, criteria: &SearchCriteria) -> Vec<CoworkingSpace> {
        if let Some(spaces) = criteria
            .coworking_spaces
            .as_ref()
            .filter(|spaces| !spaces.is_empty())
        {
            debug!("Using {} coworking spaces from request", spaces.len());
            return spaces.clone();
        }

        self.anchors
            .coworking_for(&criteria.city)
            .map(<[CoworkingSpace]>::to_vec)
            .unwrap_or_default()
    }
}
