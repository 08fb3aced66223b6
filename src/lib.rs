//! `TripPlanner` - personalized travel itineraries over a curated attraction dataset
//!
//! Attractions are retrieved by embedding similarity, re-ranked against the
//! traveller's preferences, laid out day by day and priced. Plans can be
//! served over HTTP or rendered as text and PDF.

pub mod advisor;
pub mod api;
pub mod assembler;
pub mod cache;
pub mod chat;
pub mod config;
pub mod cost;
pub mod embedding;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod maps;
pub mod models;
pub mod narrator;
pub mod planner;
pub mod ranking;
pub mod render;
pub mod retriever;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use assembler::ItineraryAssembler;
pub use config::TripPlannerConfig;
pub use cost::CostEstimator;
pub use embedding::{Embedder, HashingEmbedder, HttpEmbedder};
pub use error::TripPlannerError;
pub use extractor::{KeywordExtractor, PreferenceExtractor};
pub use models::{
    AttractionRecord, ExtractedPreferences, Itinerary, TripPlan, TripRequest, UserPreferences,
};
pub use narrator::{TemplateNarrator, TripNarrator};
pub use planner::TripPlanner;
pub use retriever::SimilarityRetriever;
pub use store::AttractionStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripPlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
