pub mod plan;

use axum::{routing::post, Router};

use super::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/plan", post(plan::plan_trip))
        .with_state(state)
}
