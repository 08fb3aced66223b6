//! Itinerary assembly
//!
//! Distributes ranked attractions over the requested number of days. The day
//! cursor only moves forward, so relevance order is preserved across days.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::models::{AttractionRecord, Itinerary, ItineraryDay, ItineraryStyle};

/// Hours of sightseeing that fit into one day unless configured otherwise
pub const DEFAULT_DAILY_HOUR_CAP: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct ItineraryAssembler {
    daily_hour_cap: f32,
}

impl Default for ItineraryAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_HOUR_CAP)
    }
}

impl ItineraryAssembler {
    pub fn new(daily_hour_cap: f32) -> Self {
        Self { daily_hour_cap }
    }

    pub fn daily_hour_cap(&self) -> f32 {
        self.daily_hour_cap
    }

    /// Partition `ranked` into exactly `days` groups.
    ///
    /// An attraction that does not fit the remaining hours or the style's
    /// per-day limit rolls to the next day. One that is longer than the cap
    /// on its own is skipped. Whatever is left after the last day is dropped.
    pub fn assemble(
        &self,
        ranked: &[Arc<AttractionRecord>],
        days: u32,
        style: ItineraryStyle,
        destination: &str,
    ) -> Itinerary {
        let mut itinerary = Itinerary {
            days: (1..=days)
                .map(|d| ItineraryDay::new(d, format!("Day {d} in {destination}")))
                .collect(),
        };
        if itinerary.days.is_empty() {
            return itinerary;
        }

        let max_per_day = style.max_per_day();
        let mut placed: HashSet<&str> = HashSet::new();
        let mut cursor = 0usize;
        let mut hours_used = 0.0f32;
        let mut dropped = 0usize;

        for attraction in ranked {
            if placed.contains(attraction.id.as_str()) {
                continue;
            }
            if attraction.duration_hours > self.daily_hour_cap {
                debug!(
                    "Skipping '{}': {}h exceeds the {}h daily cap",
                    attraction.name, attraction.duration_hours, self.daily_hour_cap
                );
                continue;
            }

            let day_full = itinerary.days[cursor].attractions.len() >= max_per_day;
            if day_full || hours_used + attraction.duration_hours > self.daily_hour_cap {
                if cursor + 1 >= itinerary.days.len() {
                    dropped += 1;
                    continue;
                }
                cursor += 1;
                hours_used = 0.0;
            }

            hours_used += attraction.duration_hours;
            placed.insert(attraction.id.as_str());
            itinerary.days[cursor].attractions.push(Arc::clone(attraction));
        }

        debug!(
            "Assembled {} attractions over {} days ({} dropped)",
            itinerary.attraction_count(),
            days,
            dropped
        );
        itinerary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attraction::fixtures::attraction;
    use rstest::rstest;

    fn ranked(hours: &[f32]) -> Vec<Arc<AttractionRecord>> {
        hours
            .iter()
            .enumerate()
            .map(|(i, h)| Arc::new(attraction(&format!("a{i}"), "Mumbai", &[], *h, 0.0)))
            .collect()
    }

    fn ids(day: &ItineraryDay) -> Vec<&str> {
        day.attractions.iter().map(|a| a.id.as_str()).collect()
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(7)]
    fn test_exactly_requested_days(#[case] days: u32) {
        let assembler = ItineraryAssembler::default();
        let itinerary = assembler.assemble(&ranked(&[2.0, 3.0, 4.0, 1.0, 5.0]), days, ItineraryStyle::Packed, "Mumbai");
        assert_eq!(itinerary.days.len(), days as usize);
        assert!(itinerary.has_unique_attractions());
        for (i, day) in itinerary.days.iter().enumerate() {
            assert_eq!(day.day, i as u32 + 1);
            assert!(day.total_hours() <= 8.0);
        }
    }

    #[test]
    fn test_rollover_on_hour_cap() {
        let assembler = ItineraryAssembler::default();
        let itinerary = assembler.assemble(&ranked(&[3.0, 4.0, 2.0, 1.0]), 2, ItineraryStyle::Packed, "Mumbai");
        assert_eq!(ids(&itinerary.days[0]), vec!["a0", "a1"]);
        assert_eq!(ids(&itinerary.days[1]), vec!["a2", "a3"]);
    }

    #[test]
    fn test_rollover_on_style_limit() {
        let assembler = ItineraryAssembler::default();
        let itinerary = assembler.assemble(&ranked(&[1.0, 1.0, 1.0, 1.0, 1.0]), 3, ItineraryStyle::Relaxed, "Goa");
        assert_eq!(ids(&itinerary.days[0]), vec!["a0", "a1"]);
        assert_eq!(ids(&itinerary.days[1]), vec!["a2", "a3"]);
        assert_eq!(ids(&itinerary.days[2]), vec!["a4"]);
        assert_eq!(itinerary.days[2].title, "Day 3 in Goa");
    }

    #[test]
    fn test_leftovers_are_dropped() {
        let assembler = ItineraryAssembler::default();
        let itinerary = assembler.assemble(&ranked(&[6.0, 6.0, 6.0]), 2, ItineraryStyle::Standard, "Mumbai");
        assert_eq!(itinerary.attraction_count(), 2);
        assert_eq!(ids(&itinerary.days[1]), vec!["a1"]);
    }

    #[test]
    fn test_fewer_attractions_than_days_leaves_empty_days() {
        let assembler = ItineraryAssembler::default();
        let itinerary = assembler.assemble(&ranked(&[2.0]), 4, ItineraryStyle::Standard, "Mumbai");
        assert_eq!(itinerary.days.len(), 4);
        assert_eq!(itinerary.days.iter().filter(|d| d.is_empty()).count(), 3);
    }

    #[test]
    fn test_oversized_attraction_is_skipped_without_advancing() {
        let assembler = ItineraryAssembler::new(8.0);
        let itinerary = assembler.assemble(&ranked(&[2.0, 10.0, 3.0]), 2, ItineraryStyle::Standard, "Mumbai");
        assert_eq!(ids(&itinerary.days[0]), vec!["a0", "a2"]);
        assert!(itinerary.days[1].is_empty());
    }

    #[test]
    fn test_duplicates_placed_once() {
        let one = Arc::new(attraction("dup", "Mumbai", &[], 1.0, 0.0));
        let itinerary = ItineraryAssembler::default().assemble(
            &[one.clone(), one.clone(), one],
            3,
            ItineraryStyle::Standard,
            "Mumbai",
        );
        assert_eq!(itinerary.attraction_count(), 1);
    }

    #[test]
    fn test_zero_days_is_empty() {
        let itinerary = ItineraryAssembler::default().assemble(&ranked(&[1.0]), 0, ItineraryStyle::Standard, "Mumbai");
        assert!(itinerary.days.is_empty());
    }
}
