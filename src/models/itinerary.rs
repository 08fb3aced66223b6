//! Itinerary and cost models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use super::{AttractionRecord, BudgetTier, UserPreferences};

/// Attractions assigned to one day of the trip
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryDay {
    /// 1-based day number
    pub day: u32,
    pub title: String,
    pub attractions: Vec<Arc<AttractionRecord>>,
}

impl ItineraryDay {
    #[must_use]
    pub fn new(day: u32, title: String) -> Self {
        Self {
            day,
            title,
            attractions: Vec::new(),
        }
    }

    /// Sum of visit durations for the day
    #[must_use]
    pub fn total_hours(&self) -> f32 {
        self.attractions.iter().map(|a| a.duration_hours).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attractions.is_empty()
    }

    /// Straight-line distance between consecutive stops that have coordinates
    #[must_use]
    pub fn route_distance_km(&self) -> Option<f64> {
        let points: Vec<_> = self
            .attractions
            .iter()
            .filter_map(|a| a.coordinates)
            .collect();
        if points.len() < 2 {
            return None;
        }
        Some(points.windows(2).map(|w| w[0].distance_km(&w[1])).sum())
    }

    /// City of the first stop, used for hotel suggestions
    #[must_use]
    pub fn main_city(&self) -> Option<&str> {
        self.attractions.first().map(|a| a.city.as_str())
    }
}

/// Day-partitioned sequence of attractions for one request
#[derive(Debug, Clone, Serialize)]
pub struct Itinerary {
    pub days: Vec<ItineraryDay>,
}

impl Itinerary {
    /// Every scheduled attraction in day order
    pub fn attractions(&self) -> impl Iterator<Item = &Arc<AttractionRecord>> {
        self.days.iter().flat_map(|d| d.attractions.iter())
    }

    #[must_use]
    pub fn attraction_count(&self) -> usize {
        self.days.iter().map(|d| d.attractions.len()).sum()
    }

    /// True when no attraction id is scheduled twice
    #[must_use]
    pub fn has_unique_attractions(&self) -> bool {
        let mut seen = HashSet::new();
        self.attractions().all(|a| seen.insert(a.id.as_str()))
    }
}

/// Derived cost figures for a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Entry fees after the budget multiplier
    pub attractions_total: f64,
    pub hotel_estimate: f64,
    pub grand_total: f64,
    pub per_day: f64,
    pub budget_tier: BudgetTier,
    pub currency: String,
}

/// Summary paragraph and practical tips for a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub summary: String,
    pub tips: Vec<String>,
}

/// Complete result of a planning request
#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub preferences: UserPreferences,
    pub itinerary: Itinerary,
    pub cost: CostBreakdown,
    pub summary: TripSummary,
    /// Hotel suggestions for each day's main city, indexed like `itinerary.days`
    pub hotels: Vec<Vec<String>>,
    pub season_notes: Vec<String>,
    pub route_hint: Option<String>,
    pub generated_at: DateTime<Utc>,
}
