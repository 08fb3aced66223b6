//! Heuristic travel advice: hotels, season notes and how to get there

use crate::models::{BudgetTier, Itinerary};

const MAX_NAMES_PER_NOTE: usize = 3;
const MAX_SEASON_NOTES: usize = 5;

const GENERIC_SEASON_NOTE: &str = "Most sights in this itinerary are fine year-round, but avoid peak summer \
afternoons for outdoor sightseeing and stay hydrated.";

const CITY_HOTELS: &[(&str, [&str; 3])] = &[
    (
        "goa",
        ["Beachside Resort (Calangute)", "Goa Comfort Stay", "Shoreline Guest House"],
    ),
    (
        "mumbai",
        ["Colaba Business Hotel", "Fort Heritage Inn", "Marine Drive Residency"],
    ),
    (
        "jaipur",
        ["Pink City Palace Hotel", "Hawa Mahal View Inn", "Jaipur Heritage Haveli"],
    ),
    (
        "delhi",
        ["Connaught Place Residency", "Karol Bagh Comfort Hotel", "Delhi Business Inn"],
    ),
];

fn tier_hotels(tier: BudgetTier) -> [&'static str; 3] {
    match tier {
        BudgetTier::Low => ["OYO Rooms", "Zostel Hostel", "Budget Inn Lodge"],
        BudgetTier::Medium => ["Treebo Trend Hotel", "FabHotel Business Stay", "City Comfort Residency"],
        BudgetTier::High => ["Taj Hotel & Convention", "ITC Grand", "The Oberoi"],
    }
}

/// Hotel names for a city. Known cities get their own list, everything else
/// falls back to brands matching the budget tier.
#[must_use]
pub fn suggest_hotels(city: &str, tier: BudgetTier) -> Vec<String> {
    let city = city.to_lowercase();
    let names = CITY_HOTELS
        .iter()
        .find(|(key, _)| city.contains(key))
        .map_or_else(|| tier_hotels(tier), |(_, names)| *names);
    names.iter().map(|n| (*n).to_string()).collect()
}

/// Group scheduled attractions by their best season.
///
/// Seasons appear in the order they are first met in the itinerary.
#[must_use]
pub fn season_notes(itinerary: &Itinerary) -> Vec<String> {
    let mut seasons: Vec<(&str, Vec<&str>)> = Vec::new();
    for attraction in itinerary.attractions() {
        let season = attraction.best_season.trim();
        if season.is_empty() {
            continue;
        }
        match seasons.iter_mut().find(|(s, _)| *s == season) {
            Some((_, names)) => names.push(attraction.name.as_str()),
            None => seasons.push((season, vec![attraction.name.as_str()])),
        }
    }

    if seasons.is_empty() {
        return vec![GENERIC_SEASON_NOTE.to_string()];
    }

    seasons
        .into_iter()
        .take(MAX_SEASON_NOTES)
        .map(|(season, names)| {
            let shown: Vec<&str> = names.into_iter().take(MAX_NAMES_PER_NOTE).collect();
            format!("{} are best visited in {}.", shown.join(", "), season)
        })
        .collect()
}

/// How to get from the starting city to the destination.
///
/// `None` when no starting city was given.
#[must_use]
pub fn travel_route(source_city: Option<&str>, destination: &str) -> Option<String> {
    let source = source_city.map(str::trim).filter(|s| !s.is_empty())?;
    let destination = destination.trim();
    let s = source.to_lowercase();
    let d = destination.to_lowercase();

    if s.contains(&d) || d.contains(&s) {
        return Some(format!(
            "You are already in {destination}. Use local transport like metro, bus, cab or auto for sightseeing."
        ));
    }

    let generic = format!(
        "To travel from {source} to {destination}, typical options are:\n\
         - Flight between the nearest airports\n\
         - Long-distance express train (book via IRCTC)\n\
         - Overnight sleeper bus or state transport"
    );

    let specific = if ["kochi", "ernakulam", "kerala"].iter().any(|k| s.contains(k)) && d.contains("mumbai") {
        Some(
            "- Direct flight from Kochi International Airport to Mumbai (CSMIA)\n\
             - Netravati Express or other Kerala to Mumbai trains",
        )
    } else if s.contains("delhi") && d.contains("mumbai") {
        Some(
            "- Flight from IGI Airport (Delhi) to CSMIA (Mumbai), about 2 hours\n\
             - Rajdhani or Duronto Express from New Delhi to Mumbai Central",
        )
    } else if s.contains("bangalore") || s.contains("bengaluru") {
        Some(
            "- Multiple daily flights from Bengaluru (BLR) to major Indian cities\n\
             - Udyan Express or other trains depending on destination",
        )
    } else {
        None
    };

    Some(match specific {
        Some(lines) => format!("Recommended route from {source} to {destination}:\n{lines}\n\n{generic}"),
        None => format!("{generic}\nChoose based on time, comfort and budget."),
    })
}
