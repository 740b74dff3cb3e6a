use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::planner::PlanError;
use crate::providers::routing::RoutingError;

/// JSON body returned with every error status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps planner errors onto HTTP statuses.
#[derive(Debug)]
pub struct ApiError(pub PlanError);

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PlanError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            PlanError::Routing(RoutingError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            PlanError::Routing(RoutingError::Malformed(_)) => StatusCode::BAD_GATEWAY,
            PlanError::Infeasible(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
