use crate::models::{Listing, ListingInsights, SafetyEvaluation};
use crate::providers::traits::{AnalysisContext, LlmProvider};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

const REQUIREMENTS_PROMPT: &str = r#"You turn travel requests from groups of hackers into JSON.
Today is {{CURRENT_DATE}}. Dates without a year refer to the next occurrence: a month that has
already passed this year ({{CURRENT_YEAR}}) means {{NEXT_YEAR}}.
Return a single JSON object with exactly these keys:
- destination: { city?, country?, region?, rawText } where rawText quotes the user's wording
- dates: { startDate?, endDate? (YYYY-MM-DD), roughWindow?, durationDays?, isFlexible }
- travelers: { count?, roomPreferences? }
- budget?: { amount?, currency?, perPerson? }
- workspace: { needs: string[], wifi?, coworking? }
- vibe: string[]
- constraints: [{ description, type: "HARD" | "SOFT" | "COMMONSENSE" }]
Omit anything the user did not say. Never invent dates or traveler counts."#;

const SAFETY_PROMPT: &str = r#"You assess how safe the area around a short-term rental is for a group of visitors.
Use only the listing data provided (city, neighborhood, coordinates, description).
Return JSON { "safety_score": integer 0-100, "reason": one or two sentences }."#;

const ANALYSIS_PROMPT: &str = r#"You are a booking analyst. Given listings, one event, and coworking spaces, return JSON with concise insights.
For each listing, produce:
- listingId
- areaSafety: one short sentence using only provided data (no hallucinations).
- eventProximity: description (walk/drive) and distanceKm if coordinates exist.
- coworkingProximity: nearest coworking with name, description, and distanceKm if coordinates exist.
- caveats: optional short warning (noise, hills, transit gaps).
Rules:
- Use only provided fields (city, neighborhood, coordinates, safetyScore, distanceToEvent).
- If coordinates are 0/0 or missing, treat distance as unknown and omit distanceKm.
- Keep sentences tight and factual. No markdown or prose outside JSON.
Return JSON object { "insights": ListingInsights[] }."#;

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChoiceRaw>,
}

#[derive(Debug, Deserialize)]
struct ChoiceRaw {
    message: MessageRaw,
}

#[derive(Debug, Deserialize)]
struct MessageRaw {
    content: Option<String>,
}

/// LLM collaborator backed by the OpenAI chat completions API
pub struct OpenAiLlmProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiLlmProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            warn!("OPENAI_API_KEY is not set. OpenAI requests will fail.");
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Send a system + user prompt and parse the JSON object the model returns
    async fn complete_json(&self, system: &str, user: &str) -> Result<Value> {
        let start = Instant::now();

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "response_format": { "type": "json_object" }
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        let chat: ChatResponseRaw = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| anyhow!("OpenAI returned empty content"))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        serde_json::from_str(&content).context("OpenAI returned content that is not JSON")
    }
}

/// Fill the date placeholders of the requirements prompt
fn requirements_prompt_for(today: NaiveDate) -> String {
    REQUIREMENTS_PROMPT
        .replace("{{CURRENT_DATE}}", &today.format("%B %-d, %Y").to_string())
        .replace("{{CURRENT_YEAR}}", &today.year().to_string())
        .replace("{{NEXT_YEAR}}", &(today.year() + 1).to_string())
}

/// Accept either a bare insights array or `{ "insights": [...] }`
fn insights_payload(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("insights") => {
            map.remove("insights").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn parse_safety(value: Value) -> Result<SafetyEvaluation> {
    let evaluation: SafetyEvaluation = serde_json::from_value(value)
        .context("LLM safety evaluation response failed validation")?;
    if evaluation.safety_score > 100 {
        anyhow::bail!(
            "LLM safety evaluation response failed validation: score {} out of range",
            evaluation.safety_score
        );
    }
    Ok(evaluation)
}

#[async_trait]
impl LlmProvider for OpenAiLlmProvider {
    async fn parse_requirements(&self, message: &str) -> Result<Value> {
        info!("Parsing travel requirements with {}", self.model);

        let system = requirements_prompt_for(Utc::now().date_naive());
        self.complete_json(&system, message).await
    }

    async fn evaluate_safety(&self, listing: &Listing) -> Result<SafetyEvaluation> {
        debug!("Evaluating safety for listing {} in {}", listing.id, listing.city);

        let user = serde_json::to_string_pretty(listing)?;
        let value = self.complete_json(SAFETY_PROMPT, &user).await?;
        parse_safety(value)
    }

    async fn analyze_listings(
        &self,
        listings: &[Listing],
        context: AnalysisContext<'_>,
    ) -> Result<Vec<ListingInsights>> {
        info!("Analyzing {} listings against {}", listings.len(), context.event.name);

        // previous insights would only bias the model
        let sanitized: Vec<Listing> = listings
            .iter()
            .cloned()
            .map(|listing| Listing {
                insights: None,
                ..listing
            })
            .collect();

        let user = serde_json::to_string_pretty(&json!({
            "event": context.event,
            "coworkingSpaces": context.coworking_spaces,
            "listings": sanitized,
        }))?;

        let value = self.complete_json(ANALYSIS_PROMPT, &user).await?;
        serde_json::from_value(insights_payload(value))
            .context("LLM analysis response failed validation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_current_and_next_year() {
        let prompt = requirements_prompt_for(NaiveDate::from_ymd_opt(2025, 11, 22).unwrap());
        assert!(prompt.contains("Today is November 22, 2025."));
        assert!(prompt.contains("(2025) means 2026"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn insights_accepted_bare_or_wrapped() {
        let insight = json!({
            "listingId": "1",
            "areaSafety": "Busy but safe",
            "eventProximity": { "description": "5 minute walk" },
            "coworkingProximity": { "description": "Next door" }
        });

        for payload in [json!([insight.clone()]), json!({ "insights": [insight.clone()] })] {
            let parsed: Vec<ListingInsights> =
                serde_json::from_value(insights_payload(payload)).unwrap();
            assert_eq!(parsed[0].listing_id, "1");
        }
    }

    #[test]
    fn safety_score_must_be_within_range() {
        let ok = parse_safety(json!({ "safety_score": 85, "reason": "Well lit" })).unwrap();
        assert_eq!(ok.safety_score, 85);

        assert!(parse_safety(json!({ "safety_score": 140, "reason": "?" })).is_err());
        assert!(parse_safety(json!({ "safety_score": 85.5, "reason": "?" })).is_err());
        assert!(parse_safety(json!({ "reason": "no score" })).is_err());
    }
}
