//! Output formats for a finished plan

pub mod pdf;
pub mod text;

pub use pdf::render_pdf;
pub use text::render_text;

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;
    use std::sync::Arc;

    use crate::advisor;
    use crate::assembler::ItineraryAssembler;
    use crate::cost::CostEstimator;
    use crate::models::attraction::fixtures::attraction;
    use crate::models::{
        BudgetTier, Coordinates, GroupType, ItineraryStyle, TripPlan, TripSummary, UserPreferences,
    };

    /// Two-day Mumbai plan with coordinates on some stops
    pub fn sample_plan() -> TripPlan {
        let mut gateway = attraction("a1", "Mumbai", &["history"], 1.5, 0.0);
        gateway.name = "Gateway of India".to_string();
        gateway.coordinates = Some(Coordinates {
            latitude: 18.9220,
            longitude: 72.8347,
        });
        let mut museum = attraction("a2", "Mumbai", &["museum"], 3.0, 150.0);
        museum.name = "Chhatrapati Shivaji Maharaj Vastu Sangrahalaya".to_string();
        museum.coordinates = Some(Coordinates {
            latitude: 18.9269,
            longitude: 72.8326,
        });
        let mut beach = attraction("a3", "Mumbai", &["beach"], 2.0, 0.0);
        beach.name = "Juhu Beach".to_string();
        beach.best_season = "November to February".to_string();
        let mut caves = attraction("a4", "Mumbai", &["history"], 5.0, 600.0);
        caves.name = "Elephanta Caves".to_string();

        let prefs = UserPreferences {
            destination: "Mumbai".to_string(),
            days: 2,
            budget_tier: BudgetTier::Medium,
            group_type: GroupType::Couple,
            interests: ["history".to_string(), "beaches".to_string()].into_iter().collect(),
            itinerary_style: ItineraryStyle::Standard,
            source_city: Some("Pune".to_string()),
        };
        let ranked: Vec<_> = [gateway, museum, beach, caves].into_iter().map(Arc::new).collect();
        let itinerary = ItineraryAssembler::default().assemble(&ranked, 2, prefs.itinerary_style, "Mumbai");
        let cost = CostEstimator::default().estimate_itinerary(&itinerary, prefs.group_type, prefs.budget_tier);
        let hotels = itinerary
            .days
            .iter()
            .map(|d| advisor::suggest_hotels(d.main_city().unwrap_or("Mumbai"), prefs.budget_tier))
            .collect();

        TripPlan {
            season_notes: advisor::season_notes(&itinerary),
            route_hint: advisor::travel_route(prefs.source_city.as_deref(), &prefs.destination),
            summary: TripSummary {
                summary: "Two easy days in Mumbai \u{2013} history by day, the sea by evening.".to_string(),
                tips: vec!["Carry cash for \u{20B9}10 ferry tickets.".to_string()],
            },
            preferences: prefs,
            itinerary,
            cost,
            hotels,
            generated_at: Utc::now(),
        }
    }
}
