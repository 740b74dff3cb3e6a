//! Trip planning endpoint.

use axum::{extract::State, Json};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::api::{ApiError, AppState, ErrorResponse};
use crate::models::{DutyStatus, Location, RoutePlan, Segment, SegmentType};
use crate::planner::PlanError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlanTripRequest {
    pub current_location: Location,
    pub pickup_location: Location,
    pub drop_off_location: Location,
    /// On-duty hours already used of the rolling 8-day cycle, in [0, 70].
    pub current_cycle_used: f64,
    /// RFC 3339 timestamp the trip starts at.
    pub start_time: DateTime<Utc>,
    /// Offset applied to every timestamp in the response.
    pub timezone_offset_minutes: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SegmentResponse {
    #[serde(rename = "type")]
    pub kind: SegmentType,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub duration_hours: f64,
    pub distance_miles: f64,
    pub status: DutyStatus,
    pub start_coordinates: Location,
    pub end_coordinates: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanTripResponse {
    pub segments: Vec<SegmentResponse>,
    pub total_distance_miles: f64,
    pub total_duration_hours: f64,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub route_geometry: Vec<Location>,
    pub driving_time: f64,
    pub resting_time: f64,
}

/// Plan an HOS-compliant trip through a pickup stop to a drop-off stop.
#[utoipa::path(
    post,
    path = "/api/trips/plan",
    request_body = PlanTripRequest,
    responses(
        (status = 200, description = "The planned trip", body = PlanTripResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "Routing oracle returned a malformed response", body = ErrorResponse),
        (status = 503, description = "Routing oracle unavailable", body = ErrorResponse)
    ),
    tag = "trips"
)]
pub async fn plan_trip(
    State(state): State<AppState>,
    Json(request): Json<PlanTripRequest>,
) -> Result<Json<PlanTripResponse>, ApiError> {
    let offset = parse_offset(request.timezone_offset_minutes)?;

    let plan = state
        .planner
        .plan_trip(
            request.current_location,
            request.pickup_location,
            request.drop_off_location,
            request.current_cycle_used,
            request.start_time,
        )
        .await?;

    info!(segments = plan.segments.len(), "planned trip");
    Ok(Json(render_plan(plan, offset)))
}

fn parse_offset(minutes: i32) -> Result<FixedOffset, PlanError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| PlanError::InvalidRequest {
            field: "timezone_offset_minutes".to_string(),
            reason: format!("{minutes} is not a valid UTC offset"),
        })
}

fn render_plan(plan: RoutePlan, offset: FixedOffset) -> PlanTripResponse {
    PlanTripResponse {
        total_distance_miles: plan.total_distance_miles,
        total_duration_hours: plan.total_duration_hours,
        start_time: plan.start_time.with_timezone(&offset),
        end_time: plan.end_time.with_timezone(&offset),
        route_geometry: plan.route_geometry,
        driving_time: plan.driving_time_hours,
        resting_time: plan.resting_time_hours,
        segments: plan
            .segments
            .into_iter()
            .map(|segment| render_segment(segment, offset))
            .collect(),
    }
}

fn render_segment(segment: Segment, offset: FixedOffset) -> SegmentResponse {
    SegmentResponse {
        kind: segment.kind,
        start_time: segment.start_time.with_timezone(&offset),
        end_time: segment.end_time.with_timezone(&offset),
        duration_hours: segment.duration_hours,
        distance_miles: segment.distance_miles,
        status: segment.status,
        start_coordinates: segment.start_coordinates,
        end_coordinates: segment.end_coordinates,
        location: segment.location,
    }
}
