//! Cost estimation from fixed lookup tables

use crate::models::{AttractionRecord, BudgetTier, CostBreakdown, GroupType, Itinerary};

/// Nightly rate per room for each budget tier
fn nightly_room_rate(tier: BudgetTier) -> f64 {
    match tier {
        BudgetTier::Low => 1500.0,
        BudgetTier::Medium => 2500.0,
        BudgetTier::High => 4000.0,
    }
}

fn rooms(group: GroupType) -> f64 {
    match group {
        GroupType::Solo | GroupType::Couple => 1.0,
        GroupType::Family | GroupType::Friends => 2.0,
    }
}

/// Scale factor applied to entry fees
#[must_use]
pub fn budget_multiplier(tier: BudgetTier) -> f64 {
    match tier {
        BudgetTier::Low => 0.75,
        BudgetTier::Medium => 1.0,
        BudgetTier::High => 1.5,
    }
}

/// Hotel cost for the whole stay
#[must_use]
pub fn hotel_estimate(group: GroupType, days: u32, tier: BudgetTier) -> f64 {
    nightly_room_rate(tier) * rooms(group) * f64::from(days)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone)]
pub struct CostEstimator {
    currency: String,
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::new("INR")
    }
}

impl CostEstimator {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    /// Cost of a set of attractions plus the hotel.
    ///
    /// Fees are summed in id order so that the same set always produces the
    /// same floating point total regardless of day assignment.
    pub fn estimate<'a, I>(
        &self,
        attractions: I,
        group: GroupType,
        days: u32,
        tier: BudgetTier,
    ) -> CostBreakdown
    where
        I: IntoIterator<Item = &'a AttractionRecord>,
    {
        let mut fees: Vec<(&str, f64)> = attractions
            .into_iter()
            .map(|a| (a.id.as_str(), a.entry_fee))
            .collect();
        fees.sort_by(|a, b| a.0.cmp(b.0));
        let fee_sum: f64 = fees.iter().map(|(_, fee)| fee).sum();

        let attractions_total = round2(fee_sum * budget_multiplier(tier));
        let hotel = round2(hotel_estimate(group, days, tier));
        let grand_total = round2(attractions_total + hotel);
        let per_day = if days > 0 {
            round2(grand_total / f64::from(days))
        } else {
            grand_total
        };

        CostBreakdown {
            attractions_total,
            hotel_estimate: hotel,
            grand_total,
            per_day,
            budget_tier: tier,
            currency: self.currency.clone(),
        }
    }

    /// Cost of everything scheduled in an itinerary
    pub fn estimate_itinerary(
        &self,
        itinerary: &Itinerary,
        group: GroupType,
        tier: BudgetTier,
    ) -> CostBreakdown {
        let days = u32::try_from(itinerary.days.len()).unwrap_or(u32::MAX);
        self.estimate(itinerary.attractions().map(|a| a.as_ref()), group, days, tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attraction::fixtures::attraction;
    use rstest::rstest;

    #[rstest]
    #[case(GroupType::Family, 3, BudgetTier::Medium, 15000.0)]
    #[case(GroupType::Solo, 2, BudgetTier::Low, 3000.0)]
    #[case(GroupType::Couple, 1, BudgetTier::High, 4000.0)]
    #[case(GroupType::Friends, 4, BudgetTier::High, 32000.0)]
    fn test_hotel_estimate(
        #[case] group: GroupType,
        #[case] days: u32,
        #[case] tier: BudgetTier,
        #[case] expected: f64,
    ) {
        assert_eq!(hotel_estimate(group, days, tier), expected);
    }

    #[test]
    fn test_medium_budget_formula() {
        let records = [
            attraction("a", "Mumbai", &[], 2.0, 250.0),
            attraction("b", "Mumbai", &[], 2.0, 0.0),
            attraction("c", "Mumbai", &[], 2.0, 100.5),
        ];
        let cost = CostEstimator::default().estimate(records.iter(), GroupType::Family, 3, BudgetTier::Medium);

        assert_eq!(cost.attractions_total, 350.5);
        assert_eq!(cost.hotel_estimate, hotel_estimate(GroupType::Family, 3, BudgetTier::Medium));
        assert_eq!(cost.grand_total, 350.5 + 15000.0);
        assert_eq!(cost.per_day, 5116.83);
        assert_eq!(cost.currency, "INR");
    }

    #[test]
    fn test_multiplier_applies_to_fees_only() {
        let records = [attraction("a", "Goa", &[], 2.0, 200.0)];
        let low = CostEstimator::default().estimate(records.iter(), GroupType::Solo, 1, BudgetTier::Low);
        let high = CostEstimator::default().estimate(records.iter(), GroupType::Solo, 1, BudgetTier::High);
        assert_eq!(low.attractions_total, 150.0);
        assert_eq!(high.attractions_total, 300.0);
        assert_eq!(low.grand_total, 150.0 + 1500.0);
    }

    #[test]
    fn test_deterministic_regardless_of_order() {
        let records = [
            attraction("a", "Goa", &[], 2.0, 0.1),
            attraction("b", "Goa", &[], 2.0, 0.2),
            attraction("c", "Goa", &[], 2.0, 0.3),
        ];
        let estimator = CostEstimator::default();
        let forward = estimator.estimate(records.iter(), GroupType::Couple, 2, BudgetTier::High);
        let backward = estimator.estimate(records.iter().rev(), GroupType::Couple, 2, BudgetTier::High);
        assert_eq!(forward, backward);
    }
}
