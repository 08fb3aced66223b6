//! Trip planning pipeline
//!
//! Validates a request, retrieves and ranks attractions, lays them out over
//! the days, prices the trip and adds advice and a narrative summary.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::advisor;
use crate::assembler::ItineraryAssembler;
use crate::config::PlannerConfig;
use crate::cost::CostEstimator;
use crate::embedding::Embedder;
use crate::extractor::{KeywordExtractor, PreferenceExtractor};
use crate::models::{TripPlan, TripRequest, UserPreferences};
use crate::narrator::{TemplateNarrator, TripNarrator};
use crate::ranking;
use crate::retriever::SimilarityRetriever;
use crate::store::AttractionStore;
use crate::{Result, TripPlannerError};

pub struct TripPlanner {
    retriever: SimilarityRetriever,
    assembler: ItineraryAssembler,
    estimator: CostEstimator,
    narrator: Arc<dyn TripNarrator>,
    extractor: Arc<dyn PreferenceExtractor>,
    max_results: usize,
    max_days: u32,
    preference_rerank: bool,
}

impl TripPlanner {
    pub fn new(
        store: Arc<AttractionStore>,
        embedder: Arc<dyn Embedder>,
        narrator: Arc<dyn TripNarrator>,
        config: &PlannerConfig,
    ) -> Self {
        Self {
            retriever: SimilarityRetriever::new(store, embedder),
            assembler: ItineraryAssembler::new(config.daily_hour_cap),
            estimator: CostEstimator::new(config.currency.clone()),
            narrator,
            extractor: Arc::new(KeywordExtractor),
            max_results: config.max_results as usize,
            max_days: config.max_days,
            preference_rerank: config.preference_rerank,
        }
    }

    /// Replace the keyword extractor used for free-text notes
    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn PreferenceExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn store(&self) -> &Arc<AttractionStore> {
        self.retriever.store()
    }

    pub fn max_days(&self) -> u32 {
        self.max_days
    }

    /// Validate a raw request and plan it.
    ///
    /// Validation errors are returned before anything is embedded. Notes
    /// only fill the fields the request leaves blank.
    pub async fn plan(&self, request: TripRequest) -> Result<TripPlan> {
        request.checked_days(self.max_days)?;
        let request = self.read_notes(request).await;
        let prefs = request.into_preferences(self.max_days)?;
        self.plan_preferences(prefs).await
    }

    async fn read_notes(&self, request: TripRequest) -> TripRequest {
        let Some(notes) = request.notes() else {
            return request;
        };
        let extracted = self.extractor.extract(notes).await;
        match extracted {
            Ok(extracted) => {
                debug!("Read preferences from notes: {:?}", extracted);
                request.with_extracted(extracted)
            }
            Err(e) => {
                warn!(
                    "Extractor '{}' failed, using the request fields only: {}",
                    self.extractor.name(),
                    e
                );
                request
            }
        }
    }

    #[instrument(skip(self, prefs), fields(destination = %prefs.destination, days = prefs.days))]
    pub async fn plan_preferences(&self, prefs: UserPreferences) -> Result<TripPlan> {
        if prefs.days == 0 || prefs.days > self.max_days {
            return Err(TripPlannerError::validation(format!(
                "Number of days must be between 1 and {}, got {}",
                self.max_days, prefs.days
            )));
        }

        // Enough candidates to fill every slot the style allows
        let slots = prefs.days as usize * prefs.itinerary_style.max_per_day();
        let k = self.max_results.max(slots);

        let mut results = self
            .retriever
            .retrieve(&prefs.destination, &prefs.interests, k)
            .await?;
        if results.is_empty() {
            return Err(TripPlannerError::no_match(&prefs.destination));
        }
        if self.preference_rerank {
            results = ranking::rerank(results, &prefs);
        }
        let ranked: Vec<_> = results.into_iter().map(|r| r.record).collect();
        debug!("Ranked {} candidate attractions", ranked.len());

        let itinerary = self
            .assembler
            .assemble(&ranked, prefs.days, prefs.itinerary_style, &prefs.destination);
        let cost = self
            .estimator
            .estimate_itinerary(&itinerary, prefs.group_type, prefs.budget_tier);

        let hotels = itinerary
            .days
            .iter()
            .map(|day| {
                let city = day.main_city().unwrap_or(prefs.destination.as_str());
                advisor::suggest_hotels(city, prefs.budget_tier)
            })
            .collect();
        let season_notes = advisor::season_notes(&itinerary);
        let route_hint = advisor::travel_route(prefs.source_city.as_deref(), &prefs.destination);

        let summary = match self.narrator.narrate(&prefs, &itinerary, &cost).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(
                    "Narrator '{}' failed, using template summary: {}",
                    self.narrator.name(),
                    e
                );
                TemplateNarrator::compose(&prefs, &itinerary, &cost)
            }
        };

        info!(
            "Planned {} attractions over {} days, estimated {} {:.2}",
            itinerary.attraction_count(),
            prefs.days,
            cost.currency,
            cost.grand_total
        );

        Ok(TripPlan {
            preferences: prefs,
            itinerary,
            cost,
            summary,
            hotels,
            season_notes,
            route_hint,
            generated_at: Utc::now(),
        })
    }
}
