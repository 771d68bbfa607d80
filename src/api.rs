use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::contributions::ContributionCalendar;
use crate::error::UpstreamError;
use crate::profile_service::{PortfolioProfile, ProfileService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProfileService>,
}

impl AppState {
    pub fn new(service: Arc<ProfileService>) -> Self {
        Self { service }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/portfolio/{username}", get(portfolio))
        .route("/contributions/{username}", get(contributions))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Boundary mapping from the upstream taxonomy to response statuses. Only
/// the fatal set ever reaches this point; everything else was repaired by
/// the fallback path.
struct ApiError(UpstreamError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            UpstreamError::NotFound => (StatusCode::NOT_FOUND, "user not found".to_string()),
            UpstreamError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "upstream rate limit exceeded, try again later".to_string(),
            ),
            UpstreamError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "upstream timed out".to_string(),
            ),
            UpstreamError::AuthInvalid
            | UpstreamError::Unavailable { .. }
            | UpstreamError::Transport(_) => (
                StatusCode::BAD_GATEWAY,
                "upstream unavailable".to_string(),
            ),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<UpstreamError> for ApiError {
    fn from(e: UpstreamError) -> Self {
        Self(e)
    }
}

async fn portfolio(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PortfolioProfile>, ApiError> {
    let profile = state.service.portfolio_profile(&username).await?;
    Ok(Json(profile))
}

async fn contributions(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ContributionCalendar>, ApiError> {
    let calendar = state.service.contribution_calendar(&username).await?;
    Ok(Json(calendar))
}
