use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::models::{AttractionRecord, CostBreakdown, ItineraryDay, TripPlan, TripRequest, UserPreferences};
use crate::planner::TripPlanner;
use crate::{TripPlannerError, VERSION, maps, render};

/// Shared, read-only state for all handlers
pub struct AppState {
    pub planner: TripPlanner,
}

pub type SharedState = Arc<AppState>;

#[derive(Serialize, Deserialize)]
pub struct ApiAttraction {
    pub id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub tags: Vec<String>,
    pub description: String,
    pub rating: f32,
    pub duration_hours: f32,
    pub entry_fee: f64,
    pub cost_level: String,
    pub best_season: String,
    pub map_url: String,
}

#[derive(Serialize, Deserialize)]
pub struct ApiDay {
    pub day: u32,
    pub title: String,
    pub total_hours: f32,
    pub attractions: Vec<ApiAttraction>,
    pub route_url: Option<String>,
    pub route_distance_km: Option<f64>,
    pub hotels: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiPlan {
    pub preferences: UserPreferences,
    pub days: Vec<ApiDay>,
    pub cost: CostBreakdown,
    pub summary: String,
    pub tips: Vec<String>,
    pub season_notes: Vec<String>,
    pub route_hint: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl From<&AttractionRecord> for ApiAttraction {
    fn from(a: &AttractionRecord) -> Self {
        Self {
            id: a.id.clone(),
            name: a.name.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            tags: a.tags.iter().cloned().collect(),
            description: a.description.clone(),
            rating: a.rating,
            duration_hours: a.duration_hours,
            entry_fee: a.entry_fee,
            cost_level: a.cost_level.to_string(),
            best_season: a.best_season.clone(),
            map_url: maps::attraction_map_url(a),
        }
    }
}

impl ApiDay {
    fn new(day: &ItineraryDay, hotels: Vec<String>) -> Self {
        Self {
            day: day.day,
            title: day.title.clone(),
            total_hours: day.total_hours(),
            attractions: day.attractions.iter().map(|a| ApiAttraction::from(a.as_ref())).collect(),
            route_url: maps::day_route_url(day),
            route_distance_km: day.route_distance_km(),
            hotels,
        }
    }
}

impl From<TripPlan> for ApiPlan {
    fn from(plan: TripPlan) -> Self {
        let mut hotels = plan.hotels.into_iter();
        let days = plan
            .itinerary
            .days
            .iter()
            .map(|d| ApiDay::new(d, hotels.next().unwrap_or_default()))
            .collect();
        Self {
            preferences: plan.preferences,
            days,
            cost: plan.cost,
            summary: plan.summary.summary,
            tips: plan.summary.tips,
            season_notes: plan.season_notes,
            route_hint: plan.route_hint,
            generated_at: plan.generated_at,
        }
    }
}

impl IntoResponse for TripPlannerError {
    fn into_response(self) -> Response {
        let status = match self {
            TripPlannerError::Validation { .. } => StatusCode::BAD_REQUEST,
            TripPlannerError::NoMatch { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        let body = json!({
            "error": self.kind(),
            "message": self.user_message(),
        });
        (status, Json(body)).into_response()
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/destinations", get(destinations))
        .route("/plan", post(plan))
        .route("/plan/pdf", post(plan_pdf))
        .with_state(state)
}

async fn health(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": VERSION,
        "attractions": state.planner.store().len(),
    }))
}

async fn destinations(State(state): State<SharedState>) -> Json<Vec<String>> {
    Json(state.planner.store().destinations())
}

fn request_body(
    payload: std::result::Result<Json<TripRequest>, JsonRejection>,
) -> crate::Result<TripRequest> {
    payload
        .map(|Json(request)| request)
        .map_err(|e| TripPlannerError::validation(e.body_text()))
}

async fn plan(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<TripRequest>, JsonRejection>,
) -> crate::Result<Json<ApiPlan>> {
    let request = request_body(payload)?;
    let plan = state.planner.plan(request).await?;
    Ok(Json(ApiPlan::from(plan)))
}

async fn plan_pdf(
    State(state): State<SharedState>,
    payload: std::result::Result<Json<TripRequest>, JsonRejection>,
) -> crate::Result<Response> {
    let request = request_body(payload)?;
    let plan = state.planner.plan(request).await?;
    let filename = pdf_filename(&plan.preferences.destination);

    let bytes = tokio::task::spawn_blocking(move || render::render_pdf(&plan))
        .await
        .map_err(|e| TripPlannerError::render(e.to_string()))??;
    info!("Serving {} ({} bytes)", filename, bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// `itinerary-<destination>.pdf` with anything but ASCII letters and digits replaced
fn pdf_filename(destination: &str) -> String {
    let slug: String = destination
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "itinerary.pdf".to_string()
    } else {
        format!("itinerary-{slug}.pdf")
    }
}
