//! Trip summary and tips
//!
//! The template narrator is deterministic and always available. The LLM
//! narrator talks to an OpenAI-compatible chat completions endpoint and the
//! planner falls back to the template whenever it fails.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::chat::{ChatClient, json_object};
use crate::config::{NarratorConfig, NarratorProvider};
use crate::models::{BudgetTier, CostBreakdown, GroupType, Itinerary, TripSummary, UserPreferences};
use crate::{Result, TripPlannerError};

const SYSTEM_PROMPT: &str = "You are a helpful travel assistant. Given user preferences, a day-wise \
itinerary and a cost estimation, write a concise trip summary paragraph (3-6 sentences) and 4-6 \
practical travel tips for this destination and trip type. Respond with JSON only: \
{\"summary\": \"...\", \"tips\": [\"...\"]}";

#[async_trait]
pub trait TripNarrator: Send + Sync {
    async fn narrate(
        &self,
        prefs: &UserPreferences,
        itinerary: &Itinerary,
        cost: &CostBreakdown,
    ) -> Result<TripSummary>;

    fn name(&self) -> &str;
}

/// Build the narrator selected in configuration
pub fn from_config(config: &NarratorConfig) -> Result<Arc<dyn TripNarrator>> {
    Ok(match config.provider {
        NarratorProvider::Template => Arc::new(TemplateNarrator),
        NarratorProvider::Llm => Arc::new(LlmNarrator::from_config(config)?),
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    #[must_use]
    pub fn compose(prefs: &UserPreferences, itinerary: &Itinerary, cost: &CostBreakdown) -> TripSummary {
        let highlights: Vec<&str> = itinerary.attractions().take(3).map(|a| a.name.as_str()).collect();
        let interests = if prefs.interests.is_empty() {
            "sightseeing".to_string()
        } else {
            prefs.interests.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        let day_word = if prefs.days == 1 { "day" } else { "days" };

        let mut summary = format!(
            "This {}-day {} trip to {} is planned for a {} group with a {} budget.",
            prefs.days,
            prefs.itinerary_style.as_str(),
            prefs.destination,
            prefs.group_type,
            prefs.budget_tier
        );
        summary.push_str(&format!(
            " It covers {} attractions over {} {} focused on {}.",
            itinerary.attraction_count(),
            prefs.days,
            day_word,
            interests
        ));
        if !highlights.is_empty() {
            summary.push_str(&format!(" Highlights include {}.", highlights.join(", ")));
        }
        summary.push_str(&format!(
            " The estimated total comes to about {} {:.0}.",
            cost.currency, cost.grand_total
        ));

        let group_tip = match prefs.group_type {
            GroupType::Family => "Plan breaks between sights and keep snacks handy for the kids.",
            GroupType::Couple => "Keep an evening free for a relaxed dinner or a sunset spot.",
            GroupType::Solo => "Share your live location with someone you trust and keep a copy of your ID.",
            GroupType::Friends => "Split shared costs like cabs and entry tickets with a group payment app.",
        };
        let budget_tip = match prefs.budget_tier {
            BudgetTier::Low => "Use public transport and local eateries to stretch the budget.",
            BudgetTier::Medium => "Book popular attractions online in advance to skip the queues.",
            BudgetTier::High => "Consider a private driver for the day to cover more ground comfortably.",
        };

        TripSummary {
            summary,
            tips: vec![
                "Carry basic medicines and a water bottle.".to_string(),
                "Check local weather before packing.".to_string(),
                group_tip.to_string(),
                budget_tip.to_string(),
            ],
        }
    }
}

#[async_trait]
impl TripNarrator for TemplateNarrator {
    async fn narrate(
        &self,
        prefs: &UserPreferences,
        itinerary: &Itinerary,
        cost: &CostBreakdown,
    ) -> Result<TripSummary> {
        Ok(Self::compose(prefs, itinerary, cost))
    }

    fn name(&self) -> &str {
        "template"
    }
}

pub struct LlmNarrator {
    client: ChatClient,
}

#[derive(Serialize)]
struct NarrationInput<'a> {
    preferences: &'a UserPreferences,
    itinerary: &'a Itinerary,
    cost: &'a CostBreakdown,
}

/// Pull the summary object out of a model reply
pub(crate) fn parse_summary(content: &str) -> Result<TripSummary> {
    let json = json_object(content)
        .ok_or_else(|| TripPlannerError::api("Narrator reply contained no JSON object"))?;
    let summary: TripSummary = serde_json::from_str(json)
        .map_err(|e| TripPlannerError::api(format!("Narrator reply was not valid JSON: {e}")))?;
    if summary.summary.trim().is_empty() {
        return Err(TripPlannerError::api("Narrator returned an empty summary"));
    }
    Ok(summary)
}

impl LlmNarrator {
    pub fn from_config(config: &NarratorConfig) -> Result<Self> {
        Ok(Self {
            client: ChatClient::new(
                &config.base_url,
                &config.model,
                config.api_key.clone(),
                config.timeout_seconds,
            )?,
        })
    }
}

#[async_trait]
impl TripNarrator for LlmNarrator {
    async fn narrate(
        &self,
        prefs: &UserPreferences,
        itinerary: &Itinerary,
        cost: &CostBreakdown,
    ) -> Result<TripSummary> {
        let data = serde_json::to_string_pretty(&NarrationInput {
            preferences: prefs,
            itinerary,
            cost,
        })
        .map_err(|e| TripPlannerError::api(format!("Failed to encode narration input: {e}")))?;

        let content = self
            .client
            .complete(SYSTEM_PROMPT, &format!("Data:\n{data}"), 0.4)
            .await?;
        let summary = parse_summary(&content)?;
        debug!("Narrated trip with {} tips", summary.tips.len());
        Ok(summary)
    }

    fn name(&self) -> &str {
        self.client.model()
    }
}
