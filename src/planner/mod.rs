//! The HOS-compliant trip planner.
//!
//! The [`TripPlanner`] coordinates one request: it validates the input,
//! fetches both route legs from the oracle concurrently, then plans the
//! segments sequentially against a single [`DriverClock`] and folds the
//! result into a [`RoutePlan`].

pub mod activity;
pub mod clock;
pub mod segments;
pub mod summary;

use std::future::Future;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::hos::{RuleSet, RuleSetTag};
use crate::models::{Location, RouteInformation, RoutePlan};
use crate::providers::routing::RoutingError;

pub use activity::ActivityKind;
pub use clock::DriverClock;
pub use segments::{DriveKind, InterstatePlanner};

/// Failures while planning one trip.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A request field failed validation; `field` names the offender.
    #[error("invalid request: {field}: {reason}")]
    InvalidRequest { field: String, reason: String },
    #[error(transparent)]
    Routing(#[from] RoutingError),
    /// The planner stalled with leg time remaining and no limit to rest
    /// away. Indicates a corrupted clock rather than a plannable input.
    #[error("trip planning stalled: {0}")]
    Infeasible(String),
}

/// Source of free-flowing routes between two locations.
///
/// The production implementation is the routing oracle client; tests
/// substitute a deterministic stub.
pub trait RouteSource {
    fn fetch_route(
        &self,
        origin: Location,
        destination: Location,
    ) -> impl Future<Output = Result<RouteInformation, RoutingError>> + Send;
}

/// Plans complete trips: current location, through pickup, to drop-off.
pub struct TripPlanner<R> {
    routing: R,
    rules: &'static RuleSet,
    planner: InterstatePlanner,
}

impl<R: RouteSource> TripPlanner<R> {
    pub fn new(routing: R, tag: RuleSetTag) -> Self {
        let rules = RuleSet::get(tag);
        Self {
            routing,
            rules,
            planner: InterstatePlanner::new(rules),
        }
    }

    /// Plan the whole trip.
    ///
    /// Both oracle fetches run concurrently and must succeed; the first
    /// failure cancels the sibling and aborts the request. Planning itself
    /// is sequential: segments are emitted in strictly chronological order,
    /// each starting exactly where and when the previous one ended.
    pub async fn plan_trip(
        &self,
        current: Location,
        pickup: Location,
        drop_off: Location,
        current_cycle_used: f64,
        start_time: DateTime<Utc>,
    ) -> Result<RoutePlan, PlanError> {
        validate_coordinates("current_location", current)?;
        validate_coordinates("pickup_location", pickup)?;
        validate_coordinates("drop_off_location", drop_off)?;
        if !(0.0..=self.rules.max_cycle_hours).contains(&current_cycle_used) {
            return Err(PlanError::InvalidRequest {
                field: "current_cycle_used".to_string(),
                reason: format!(
                    "must be within [0, {}], got {current_cycle_used}",
                    self.rules.max_cycle_hours
                ),
            });
        }

        let (to_pickup, to_drop_off) = tokio::try_join!(
            self.routing.fetch_route(current, pickup),
            self.routing.fetch_route(pickup, drop_off),
        )?;
        info!(
            to_pickup_miles = to_pickup.distance_miles,
            to_drop_off_miles = to_drop_off.distance_miles,
            "fetched both route legs"
        );

        let mut driver_clock = DriverClock::new(self.rules, current_cycle_used, start_time);
        let mut plan_segments = Vec::new();

        self.planner.plan_leg(
            &mut driver_clock,
            &to_pickup,
            DriveKind::ToPickup,
            &mut plan_segments,
        )?;
        self.planner.emit_activity(
            &mut driver_clock,
            ActivityKind::Pickup,
            pickup,
            &mut plan_segments,
        );

        // Cancellation point between the two CPU-bound planning passes.
        tokio::task::yield_now().await;

        self.planner.plan_leg(
            &mut driver_clock,
            &to_drop_off,
            DriveKind::ToDropOff,
            &mut plan_segments,
        )?;
        self.planner.emit_activity(
            &mut driver_clock,
            ActivityKind::DropOff,
            drop_off,
            &mut plan_segments,
        );

        let plan = summary::summarize(
            plan_segments,
            start_time,
            driver_clock.now(),
            &to_pickup.geometry,
            &to_drop_off.geometry,
        );
        info!(
            segment_count = plan.segments.len(),
            total_duration_hours = plan.total_duration_hours,
            cycle_hours_used = driver_clock.cycle_used_hours(),
            "trip plan complete"
        );
        Ok(plan)
    }
}

fn validate_coordinates(field: &str, location: Location) -> Result<(), PlanError> {
    if !(-90.0..=90.0).contains(&location.latitude) {
        return Err(PlanError::InvalidRequest {
            field: format!("{field}.latitude"),
            reason: format!("must be within [-90, 90], got {}", location.latitude),
        });
    }
    if !(-180.0..=180.0).contains(&location.longitude) {
        return Err(PlanError::InvalidRequest {
            field: format!("{field}.longitude"),
            reason: format!("must be within [-180, 180], got {}", location.longitude),
        });
    }
    Ok(())
}
