//! User preference models and request validation

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::TripPlannerError;

/// Discrete cost-scaling category applied to cost estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Low,
    #[default]
    Medium,
    High,
}

impl BudgetTier {
    /// Lenient parse: anything mentioning "low" or "high" maps there, the rest is medium
    #[must_use]
    pub fn normalize(input: &str) -> Self {
        let b = input.trim().to_lowercase();
        if b.contains("low") {
            BudgetTier::Low
        } else if b.contains("high") {
            BudgetTier::High
        } else {
            BudgetTier::Medium
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Low => "low",
            BudgetTier::Medium => "medium",
            BudgetTier::High => "high",
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is travelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Solo,
    Couple,
    Family,
    #[default]
    Friends,
}

impl GroupType {
    /// Picks the closest group type; unrecognised input falls back to friends
    #[must_use]
    pub fn normalize(input: &str) -> Self {
        let g = input.trim().to_lowercase();
        if g.contains("family") {
            GroupType::Family
        } else if g.contains("couple") {
            GroupType::Couple
        } else if g.contains("solo") {
            GroupType::Solo
        } else {
            GroupType::Friends
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupType::Solo => "solo",
            GroupType::Couple => "couple",
            GroupType::Family => "family",
            GroupType::Friends => "friends",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pacing preset that bounds how many attractions go into one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItineraryStyle {
    Relaxed,
    #[default]
    Standard,
    Packed,
}

impl ItineraryStyle {
    #[must_use]
    pub fn normalize(input: &str) -> Self {
        let s = input.trim().to_lowercase();
        if s.contains("relax") {
            ItineraryStyle::Relaxed
        } else if s.contains("pack") {
            ItineraryStyle::Packed
        } else {
            ItineraryStyle::Standard
        }
    }

    /// Maximum number of attractions scheduled on a single day
    #[must_use]
    pub fn max_per_day(&self) -> usize {
        match self {
            ItineraryStyle::Relaxed => 2,
            ItineraryStyle::Standard => 3,
            ItineraryStyle::Packed => 4,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ItineraryStyle::Relaxed => "relaxed",
            ItineraryStyle::Standard => "standard",
            ItineraryStyle::Packed => "packed",
        }
    }
}

/// Validated preferences for a single planning request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPreferences {
    pub destination: String,
    pub days: u32,
    pub budget_tier: BudgetTier,
    pub group_type: GroupType,
    pub interests: BTreeSet<String>,
    pub itinerary_style: ItineraryStyle,
    pub source_city: Option<String>,
}

/// Raw form fields as submitted by the web form, the CLI or a JSON client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TripRequest {
    pub destination: String,
    pub days: i64,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub group: String,
    /// Free text, comma separated
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub source_city: Option<String>,
    /// Additional free-text notes, read for preferences the fields leave open
    #[serde(default)]
    pub notes: Option<String>,
}

/// Preferences read from free-text notes. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPreferences {
    pub destination: Option<String>,
    pub budget: Option<BudgetTier>,
    pub group: Option<GroupType>,
    pub interests: BTreeSet<String>,
}

/// Split free-text interests on commas and semicolons into a lowercase set
#[must_use]
pub fn parse_interests(input: &str) -> BTreeSet<String> {
    input
        .split([',', ';'])
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect()
}

impl TripRequest {
    /// Trimmed notes, `None` when blank
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Fill the fields left blank from extracted notes. Explicit fields win.
    #[must_use]
    pub fn with_extracted(mut self, extracted: ExtractedPreferences) -> Self {
        if self.destination.trim().is_empty() {
            self.destination = extracted.destination.unwrap_or_default();
        }
        if self.budget.trim().is_empty() {
            self.budget = extracted.budget.map(|b| b.as_str().to_string()).unwrap_or_default();
        }
        if self.group.trim().is_empty() {
            self.group = extracted.group.map(|g| g.as_str().to_string()).unwrap_or_default();
        }
        if parse_interests(&self.interests).is_empty() && !extracted.interests.is_empty() {
            self.interests = extracted.interests.into_iter().collect::<Vec<_>>().join(", ");
        }
        self
    }

    /// Day count within `1..=max_days`
    pub fn checked_days(&self, max_days: u32) -> crate::Result<u32> {
        if self.days <= 0 {
            return Err(TripPlannerError::validation(format!(
                "Number of days must be positive, got {}",
                self.days
            )));
        }
        if self.days > i64::from(max_days) {
            return Err(TripPlannerError::validation(format!(
                "Number of days cannot exceed {max_days}, got {}",
                self.days
            )));
        }
        u32::try_from(self.days).map_err(|_| TripPlannerError::validation("Number of days is out of range"))
    }

    /// Validate the raw request and turn it into preferences.
    ///
    /// Rejects a missing destination and day counts outside `1..=max_days`.
    pub fn into_preferences(self, max_days: u32) -> crate::Result<UserPreferences> {
        let destination = self.destination.trim().to_string();
        if destination.is_empty() {
            return Err(TripPlannerError::validation("Destination cannot be empty"));
        }
        let days = self.checked_days(max_days)?;

        let source_city = self
            .source_city
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(UserPreferences {
            destination,
            days,
            budget_tier: BudgetTier::normalize(&self.budget),
            group_type: GroupType::normalize(&self.group),
            interests: parse_interests(&self.interests),
            itinerary_style: self
                .style
                .as_deref()
                .map(ItineraryStyle::normalize)
                .unwrap_or_default(),
            source_city,
        })
    }
}
