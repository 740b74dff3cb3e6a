//! HTTP surface: route registration and shared state.

pub mod error;
pub mod health;
pub mod trips;

pub use error::{ApiError, ErrorResponse};

use std::sync::Arc;

use axum::Router;

use crate::config::Config;
use crate::planner::TripPlanner;
use crate::providers::routing::RoutingClient;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner<RoutingClient>>,
    pub config: Arc<Config>,
}

pub fn router(planner: Arc<TripPlanner<RoutingClient>>, config: Arc<Config>) -> Router {
    let state = AppState { planner, config };
    Router::new()
        .nest("/trips", trips::router(state.clone()))
        .nest("/health", health::router(state))
}
