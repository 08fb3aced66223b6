//! Plain text rendering for the terminal

use std::fmt::Write;

use crate::maps;
use crate::models::TripPlan;

/// Render a plan as readable text with map links
#[must_use]
pub fn render_text(plan: &TripPlan) -> String {
    let prefs = &plan.preferences;
    let cost = &plan.cost;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Trip to {} ({} days)", prefs.destination, prefs.days);
    let _ = writeln!(
        out,
        "Budget: {} | Group: {} | Style: {}",
        prefs.budget_tier, prefs.group_type, prefs.itinerary_style.as_str()
    );
    if !prefs.interests.is_empty() {
        let interests: Vec<&str> = prefs.interests.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Interests: {}", interests.join(", "));
    }

    let _ = writeln!(out, "\nSummary\n{}", plan.summary.summary);

    if let Some(ref route) = plan.route_hint {
        let _ = writeln!(out, "\nGetting there\n{route}");
    }

    for (i, day) in plan.itinerary.days.iter().enumerate() {
        let _ = writeln!(out, "\n{} ({:.1}h)", day.title, day.total_hours());
        if day.is_empty() {
            let _ = writeln!(out, "  Free day to explore at your own pace.");
        }
        for attraction in &day.attractions {
            let _ = writeln!(
                out,
                "  - {} ({}, {}) | {:.1}h | {} {:.0} | rating {:.1}",
                attraction.name,
                attraction.city,
                attraction.state,
                attraction.duration_hours,
                cost.currency,
                attraction.entry_fee,
                attraction.rating
            );
            let _ = writeln!(out, "    {}", maps::attraction_map_url(attraction));
        }
        if let Some(url) = maps::day_route_url(day) {
            let _ = writeln!(out, "  Route: {url}");
        }
        if let Some(distance) = day.route_distance_km() {
            let _ = writeln!(out, "  Distance between stops: {distance:.1} km");
        }
        if let Some(hotels) = plan.hotels.get(i).filter(|h| !h.is_empty()) {
            let _ = writeln!(out, "  Stay: {}", hotels.join(", "));
        }
    }

    let _ = writeln!(out, "\nEstimated cost");
    let _ = writeln!(out, "  Attractions: {} {:.2}", cost.currency, cost.attractions_total);
    let _ = writeln!(out, "  Hotels:      {} {:.2}", cost.currency, cost.hotel_estimate);
    let _ = writeln!(out, "  Total:       {} {:.2}", cost.currency, cost.grand_total);
    let _ = writeln!(out, "  Per day:     {} {:.2}", cost.currency, cost.per_day);

    if !plan.season_notes.is_empty() {
        let _ = writeln!(out, "\nWhen to go");
        for note in &plan.season_notes {
            let _ = writeln!(out, "  - {note}");
        }
    }

    if !plan.summary.tips.is_empty() {
        let _ = writeln!(out, "\nTips");
        for tip in &plan.summary.tips {
            let _ = writeln!(out, "  - {tip}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::sample_plan;

    #[test]
    fn test_render_text_sections() {
        let plan = sample_plan();
        let text = render_text(&plan);

        assert!(text.starts_with("Trip to Mumbai (2 days)"));
        assert!(text.contains("Day 1 in Mumbai"));
        assert!(text.contains("Day 2 in Mumbai"));
        assert!(text.contains("https://www.google.com/maps/search/?api=1&query="));
        assert!(text.contains("Total:       INR"));
        assert!(text.contains("Getting there"));
    }
}
