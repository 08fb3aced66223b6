//! Google Maps links for attractions and day routes

use crate::models::{AttractionRecord, ItineraryDay};

const SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";
const DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// What Maps should search for: coordinates when known, else the name and place
fn place_query(attraction: &AttractionRecord) -> String {
    match attraction.coordinates {
        Some(c) => format!("{:.6},{:.6}", c.latitude, c.longitude),
        None => [attraction.name.as_str(), attraction.city.as_str(), attraction.state.as_str()]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[must_use]
pub fn attraction_map_url(attraction: &AttractionRecord) -> String {
    format!("{SEARCH_URL}{}", urlencoding::encode(&place_query(attraction)))
}

/// Directions through every stop of the day in order, `None` for fewer than two stops
#[must_use]
pub fn day_route_url(day: &ItineraryDay) -> Option<String> {
    let stops: Vec<String> = day.attractions.iter().map(|a| place_query(a)).collect();
    let (origin, rest) = stops.split_first()?;
    let (destination, waypoints) = rest.split_last()?;

    let mut url = format!(
        "{DIRECTIONS_URL}&origin={}&destination={}",
        urlencoding::encode(origin),
        urlencoding::encode(destination)
    );
    if !waypoints.is_empty() {
        let joined = waypoints.join("|");
        url.push_str("&waypoints=");
        url.push_str(&urlencoding::encode(&joined));
    }
    Some(url)
}
