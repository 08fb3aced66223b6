//! Preferences from free-text trip notes
//!
//! Notes like "travelling with the kids, we love beaches and street food"
//! fill in the request fields the traveller left blank. The keyword
//! extractor works offline; the LLM extractor asks a chat model and the
//! planner keeps the explicit fields alone when it fails.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::chat::{ChatClient, json_object};
use crate::config::{ExtractorConfig, ExtractorProvider};
use crate::models::{BudgetTier, ExtractedPreferences, GroupType};
use crate::{Result, TripPlannerError};

const SYSTEM_PROMPT: &str = "You read short notes a traveller wrote about an upcoming trip in India \
and return the preferences they imply. Respond with JSON only, using these keys: \
\"destination\" (city, state or region, or null), \"budget_level\" (low, medium or high, or null), \
\"trip_type\" (solo, couple, family or friends, or null) and \"interests\" (up to 6 short keywords \
such as beach, history, food, nature, nightlife, adventure, culture, spiritual). Use null or an \
empty list for anything the notes do not mention.";

/// Interest keyword and the phrases that imply it
const INTEREST_KEYWORDS: &[(&str, &[&str])] = &[
    ("beach", &["beach", "sea side", "seaside", "coast"]),
    ("history", &["history", "historic", "heritage", "monument"]),
    ("fort", &["fort", "palace"]),
    ("food", &["food", "cuisine", "vegetarian", "eating", "foodie"]),
    ("street food", &["street food", "chaat"]),
    ("nightlife", &["nightlife", "party", "parties", "clubbing", "pubs"]),
    ("nature", &["nature", "greenery", "scenic", "outdoors"]),
    ("hills", &["hills", "hill station", "mountain"]),
    ("adventure", &["adventure", "thrill", "trek", "hike", "rafting"]),
    ("water sports", &["water sport", "parasail", "snorkel", "scuba"]),
    ("wildlife", &["wildlife", "safari", "bird"]),
    ("spiritual", &["temple", "spiritual", "pilgrim", "shrine", "church", "mosque"]),
    ("culture", &["culture", "cultural", "arts", "handicraft"]),
    ("museum", &["museum", "gallery"]),
    ("shopping", &["shopping", "market", "bazaar", "souvenir"]),
    ("romantic", &["romantic", "honeymoon", "anniversary"]),
    ("relaxing", &["relax", "slow pace", "unwind"]),
    ("photography", &["photo", "instagram"]),
];

const GROUP_KEYWORDS: &[(GroupType, &[&str])] = &[
    (GroupType::Family, &["family", "kids", "children", "parents", "grandparents", "toddler"]),
    (GroupType::Couple, &["couple", "honeymoon", "wife", "husband", "partner", "girlfriend", "boyfriend", "anniversary"]),
    (GroupType::Friends, &["friends", "buddies", "gang", "colleagues", "bachelor"]),
    (GroupType::Solo, &["solo", "alone", "by myself", "on my own"]),
];

const BUDGET_KEYWORDS: &[(BudgetTier, &[&str])] = &[
    (BudgetTier::High, &["luxury", "luxurious", "premium", "splurge", "5-star", "five star", "high budget", "high-end"]),
    (BudgetTier::Low, &["cheap", "low budget", "backpack", "affordable", "shoestring", "budget-friendly", "hostel"]),
    (BudgetTier::Medium, &["mid-range", "moderate budget", "medium budget", "mid range"]),
];

#[async_trait]
pub trait PreferenceExtractor: Send + Sync {
    async fn extract(&self, notes: &str) -> Result<ExtractedPreferences>;

    fn name(&self) -> &str;
}

/// Build the extractor selected in configuration
pub fn from_config(config: &ExtractorConfig) -> Result<Arc<dyn PreferenceExtractor>> {
    Ok(match config.provider {
        ExtractorProvider::Keyword => Arc::new(KeywordExtractor),
        ExtractorProvider::Llm => Arc::new(LlmExtractor::from_config(config)?),
    })
}

fn first_match<T: Copy>(text: &str, table: &[(T, &[&str])]) -> Option<T> {
    table
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| text.contains(p)))
        .map(|(value, _)| *value)
}

/// Matches interests, group and budget against fixed phrase lists
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    #[must_use]
    pub fn read(notes: &str) -> ExtractedPreferences {
        let text = notes.to_lowercase();
        let interests = INTEREST_KEYWORDS
            .iter()
            .filter(|(_, phrases)| phrases.iter().any(|p| text.contains(p)))
            .map(|(interest, _)| (*interest).to_string())
            .collect();

        ExtractedPreferences {
            destination: None,
            budget: first_match(&text, BUDGET_KEYWORDS),
            group: first_match(&text, GROUP_KEYWORDS),
            interests,
        }
    }
}

#[async_trait]
impl PreferenceExtractor for KeywordExtractor {
    async fn extract(&self, notes: &str) -> Result<ExtractedPreferences> {
        Ok(Self::read(notes))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

pub struct LlmExtractor {
    client: ChatClient,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InterestList {
    List(Vec<String>),
    Text(String),
}

impl Default for InterestList {
    fn default() -> Self {
        InterestList::List(Vec::new())
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ExtractionReply {
    destination: Option<String>,
    budget_level: Option<String>,
    trip_type: Option<String>,
    interests: InterestList,
}

fn budget_from_label(label: &str) -> Option<BudgetTier> {
    let l = label.to_lowercase();
    if l.contains("low") || l.contains("high") || l.contains("medium") || l.contains("mid") {
        Some(BudgetTier::normalize(&l))
    } else {
        None
    }
}

fn group_from_label(label: &str) -> Option<GroupType> {
    let l = label.to_lowercase();
    ["solo", "couple", "family", "friends"]
        .iter()
        .any(|g| l.contains(g))
        .then(|| GroupType::normalize(&l))
}

/// Turn a model reply into extracted preferences
pub(crate) fn parse_extraction(content: &str) -> Result<ExtractedPreferences> {
    let json = json_object(content)
        .ok_or_else(|| TripPlannerError::api("Extractor reply contained no JSON object"))?;
    let reply: ExtractionReply = serde_json::from_str(json)
        .map_err(|e| TripPlannerError::api(format!("Extractor reply was not valid JSON: {e}")))?;

    let interests: BTreeSet<String> = match reply.interests {
        InterestList::List(items) => items.iter().map(|i| i.trim().to_lowercase()).collect(),
        InterestList::Text(text) => crate::models::parse_interests(&text),
    };

    Ok(ExtractedPreferences {
        destination: reply
            .destination
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        budget: reply.budget_level.as_deref().and_then(budget_from_label),
        group: reply.trip_type.as_deref().and_then(group_from_label),
        interests: interests.into_iter().filter(|i| !i.is_empty()).take(6).collect(),
    })
}

impl LlmExtractor {
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
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
impl PreferenceExtractor for LlmExtractor {
    async fn extract(&self, notes: &str) -> Result<ExtractedPreferences> {
        let content = self
            .client
            .complete(SYSTEM_PROMPT, &format!("Notes:\n{notes}"), 0.0)
            .await?;
        parse_extraction(&content)
    }

    fn name(&self) -> &str {
        self.client.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_keyword_extraction() {
        let extracted = KeywordExtractor::read(
            "Going with my wife and kids on a cheap trip. We love heritage places and good local vegetarian food",
        );
        assert_eq!(extracted.group, Some(GroupType::Family));
        assert_eq!(extracted.budget, Some(BudgetTier::Low));
        assert!(extracted.interests.contains("history"));
        assert!(extracted.interests.contains("food"));
        assert!(extracted.destination.is_none());
    }

    #[rstest]
    #[case("Honeymoon trip, want something luxurious", Some(GroupType::Couple), Some(BudgetTier::High))]
    #[case("Backpacking alone", Some(GroupType::Solo), Some(BudgetTier::Low))]
    #[case("Nothing special", None, None)]
    fn test_keyword_group_and_budget(
        #[case] notes: &str,
        #[case] group: Option<GroupType>,
        #[case] budget: Option<BudgetTier>,
    ) {
        let extracted = KeywordExtractor::read(notes);
        assert_eq!(extracted.group, group);
        assert_eq!(extracted.budget, budget);
    }

    #[test]
    fn test_parse_extraction() {
        let reply = "```json\n{\"destination\": \"Jaipur\", \"days\": 3, \"budget_level\": \"High\", \
                     \"trip_type\": \"Couple\", \"interests\": [\"Forts\", \" history \", \"\"]}\n```";
        let extracted = parse_extraction(reply).unwrap();
        assert_eq!(extracted.destination.as_deref(), Some("Jaipur"));
        assert_eq!(extracted.budget, Some(BudgetTier::High));
        assert_eq!(extracted.group, Some(GroupType::Couple));
        assert_eq!(extracted.interests.len(), 2);
        assert!(extracted.interests.contains("forts"));
    }

    #[test]
    fn test_parse_extraction_lenient_fields() {
        let extracted =
            parse_extraction("{\"destination\": \" \", \"budget_level\": \"whatever\", \"interests\": \"food; art\"}")
                .unwrap();
        assert!(extracted.destination.is_none());
        assert!(extracted.budget.is_none());
        assert!(extracted.group.is_none());
        assert!(extracted.interests.contains("art"));

        assert!(parse_extraction("no json").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_llm_is_api_error() {
        let config = ExtractorConfig {
            provider: ExtractorProvider::Llm,
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            ..ExtractorConfig::default()
        };
        let extractor = from_config(&config).unwrap();
        let err = extractor.extract("beaches please").await.unwrap_err();
        assert!(matches!(err, TripPlannerError::Api { .. }));
    }
}
