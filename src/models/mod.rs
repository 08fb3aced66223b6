//! Data models for the trip planner
//!
//! This module contains the core domain models organized by concern:
//! - Attraction: immutable records loaded from the dataset
//! - Preferences: raw requests and validated user preferences
//! - Itinerary: day groups, cost breakdown and the final plan

pub mod attraction;
pub mod itinerary;
pub mod preferences;

// Re-export all public types for convenient access
pub use attraction::{AttractionRecord, Coordinates, CostLevel, destination_tokens};
pub use itinerary::{CostBreakdown, Itinerary, ItineraryDay, TripPlan, TripSummary};
pub use preferences::{
    BudgetTier, ExtractedPreferences, GroupType, ItineraryStyle, TripRequest, UserPreferences,
    parse_interests,
};
