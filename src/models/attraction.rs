//! Attraction record model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Rough price band of an attraction, derived from its entry fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostLevel {
    Low,
    Medium,
    High,
}

impl CostLevel {
    /// Free entry is low, up to 200 is medium, anything above is high
    #[must_use]
    pub fn from_entry_fee(fee: f64) -> Self {
        if fee <= 0.0 {
            CostLevel::Low
        } else if fee <= 200.0 {
            CostLevel::Medium
        } else {
            CostLevel::High
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CostLevel::Low => "low",
            CostLevel::Medium => "medium",
            CostLevel::High => "high",
        }
    }
}

impl fmt::Display for CostLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(CostLevel::Low),
            "medium" => Ok(CostLevel::Medium),
            "high" => Ok(CostLevel::High),
            other => Err(format!("unknown cost level '{other}'")),
        }
    }
}

/// Geographic position of an attraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Great-circle distance to another point in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Kilometers,
        )
    }
}

/// A single tourist point of interest.
///
/// Records are created when the dataset is loaded and never mutated
/// afterwards; itineraries hold shared references to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttractionRecord {
    pub id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub region: String,
    pub tags: BTreeSet<String>,
    pub description: String,
    /// Google review rating (0-5)
    pub rating: f32,
    /// Number of reviews
    pub review_count: u64,
    /// Typical visit duration in hours
    pub duration_hours: f32,
    /// Entry fee in the dataset currency
    pub entry_fee: f64,
    pub cost_level: CostLevel,
    pub best_season: String,
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing)]
    pub embedding: Vec<f32>,
}

impl AttractionRecord {
    /// Text used to embed this record when the dataset carries no vector
    #[must_use]
    pub fn embedding_text(&self) -> String {
        let tags = self.tags.iter().cloned().collect::<Vec<_>>().join(", ");
        format!(
            "{}. {} Tags: {}. Located in {}, {}, {}.",
            self.name, self.description, tags, self.city, self.state, self.region
        )
    }

    /// All tags joined into one lowercase string for substring matching
    #[must_use]
    pub fn tag_text(&self) -> String {
        self.tags
            .iter()
            .map(|t| t.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True when any destination token occurs in the city, state or region
    #[must_use]
    pub fn matches_destination(&self, tokens: &[String]) -> bool {
        let city = self.city.to_lowercase();
        let state = self.state.to_lowercase();
        let region = self.region.to_lowercase();
        tokens
            .iter()
            .any(|t| city.contains(t.as_str()) || state.contains(t.as_str()) || region.contains(t.as_str()))
    }

    /// Review volume in lakhs (100k), the unit the ranking weights are tuned for
    #[must_use]
    pub fn review_lakhs(&self) -> f64 {
        self.review_count as f64 / 100_000.0
    }
}

/// Split a destination string like "Mumbai, Goa" into lowercase tokens
#[must_use]
pub fn destination_tokens(destination: &str) -> Vec<String> {
    destination
        .split(',')
        .map(|d| d.trim().to_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn attraction(id: &str, city: &str, tags: &[&str], hours: f32, fee: f64) -> AttractionRecord {
        AttractionRecord {
            id: id.to_string(),
            name: format!("Place {id}"),
            city: city.to_string(),
            state: "Maharashtra".to_string(),
            region: "Western".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: format!("A well known spot in {city}"),
            rating: 4.5,
            review_count: 10_000,
            duration_hours: hours,
            entry_fee: fee,
            cost_level: CostLevel::from_entry_fee(fee),
            best_season: String::new(),
            coordinates: None,
            embedding: vec![1.0, 0.0, 0.0],
        }
    }
}
