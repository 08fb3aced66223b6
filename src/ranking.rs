//! Preference-aware re-ranking of retrieved attractions

use std::collections::BTreeSet;

use crate::models::{AttractionRecord, BudgetTier, CostLevel, GroupType, UserPreferences};
use crate::retriever::ScoredAttraction;

const INTEREST_MATCH: f64 = 2.0;
const BUDGET_MATCH: f64 = 1.5;
const RATING_WEIGHT: f64 = 0.8;
const REVIEW_WEIGHT: f64 = 0.5;
const REVIEW_CAP_LAKHS: f64 = 5.0;
const SIMILARITY_WEIGHT: f64 = 2.0;

/// How well an attraction suits the traveller, ignoring query similarity
#[must_use]
pub fn preference_score(
    attraction: &AttractionRecord,
    interests: &BTreeSet<String>,
    group: GroupType,
    budget: BudgetTier,
) -> f64 {
    let tags = attraction.tag_text();
    let mut score = 0.0;

    for interest in interests {
        if tags.contains(interest.trim()) {
            score += INTEREST_MATCH;
        }
    }

    match group {
        GroupType::Family if tags.contains("nightlife") => score -= 1.0,
        GroupType::Couple if tags.contains("romantic") => score += 1.0,
        _ => {}
    }

    match (budget, attraction.cost_level) {
        (BudgetTier::Low, CostLevel::Low) | (BudgetTier::High, CostLevel::High) => {
            score += BUDGET_MATCH;
        }
        _ => {}
    }

    score += f64::from(attraction.rating) * RATING_WEIGHT;
    score += attraction.review_lakhs().min(REVIEW_CAP_LAKHS) * REVIEW_WEIGHT;
    score
}

/// Re-order retrieved attractions by preference score, best first.
///
/// The sort is stable, so equal scores keep retrieval order.
#[must_use]
pub fn rerank(results: Vec<ScoredAttraction>, prefs: &UserPreferences) -> Vec<ScoredAttraction> {
    let mut scored: Vec<(f64, ScoredAttraction)> = results
        .into_iter()
        .map(|r| {
            let score = preference_score(&r.record, &prefs.interests, prefs.group_type, prefs.budget_tier)
                + f64::from(r.similarity()) * SIMILARITY_WEIGHT;
            (score, r)
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, r)| r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItineraryStyle;
    use crate::models::attraction::fixtures::attraction;
    use std::sync::Arc;

    fn prefs(group: GroupType, budget: BudgetTier, interests: &[&str]) -> UserPreferences {
        UserPreferences {
            destination: "Mumbai".to_string(),
            days: 2,
            budget_tier: budget,
            group_type: group,
            interests: interests.iter().map(|i| i.to_string()).collect(),
            itinerary_style: ItineraryStyle::Standard,
            source_city: None,
        }
    }

    #[test]
    fn test_interest_and_budget_bonus() {
        let free_beach = attraction("a", "Mumbai", &["beach"], 2.0, 0.0);
        let interests: BTreeSet<String> = ["beach".to_string()].into_iter().collect();

        let base = preference_score(&free_beach, &BTreeSet::new(), GroupType::Solo, BudgetTier::Medium);
        let with_interest = preference_score(&free_beach, &interests, GroupType::Solo, BudgetTier::Medium);
        let with_budget = preference_score(&free_beach, &interests, GroupType::Solo, BudgetTier::Low);

        assert!((with_interest - base - 2.0).abs() < 1e-9);
        assert!((with_budget - with_interest - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_family_avoids_nightlife() {
        let club = attraction("c", "Goa", &["nightlife"], 3.0, 500.0);
        let family = preference_score(&club, &BTreeSet::new(), GroupType::Family, BudgetTier::Medium);
        let friends = preference_score(&club, &BTreeSet::new(), GroupType::Friends, BudgetTier::Medium);
        assert!((friends - family - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rerank_moves_interest_match_forward() {
        let results = vec![
            ScoredAttraction {
                record: Arc::new(attraction("fort", "Mumbai", &["history"], 2.0, 0.0)),
                distance: 0.1,
            },
            ScoredAttraction {
                record: Arc::new(attraction("beach", "Mumbai", &["beach", "food"], 2.0, 0.0)),
                distance: 0.3,
            },
        ];
        let ranked = rerank(results, &prefs(GroupType::Friends, BudgetTier::Medium, &["beach", "food"]));
        assert_eq!(ranked[0].record.id, "beach");
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_rerank_is_stable_on_ties() {
        let results: Vec<_> = ["x", "y", "z"]
            .iter()
            .map(|id| ScoredAttraction {
                record: Arc::new(attraction(id, "Mumbai", &[], 2.0, 0.0)),
                distance: 0.5,
            })
            .collect();
        let ranked = rerank(results, &prefs(GroupType::Solo, BudgetTier::Medium, &[]));
        let ids: Vec<_> = ranked.iter().map(|r| r.record.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }
}
