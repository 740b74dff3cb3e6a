use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Whether the service is running
    pub healthy: bool,
    /// Active HOS rule set
    pub rule_set: String,
    /// Base URL of the routing oracle this instance talks to
    pub routing_oracle_url: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        rule_set: state.config.default_rule_set.to_string(),
        routing_oracle_url: state.config.routing_oracle_url.clone(),
    })
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(health_check)).with_state(state)
}
