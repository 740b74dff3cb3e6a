//! Core domain types shared by the planner and the API layer.
//!
//! All internal duration arithmetic happens on integer-microsecond
//! [`TimeDelta`]s; floating-point hours exist only at the boundaries (the
//! routing oracle reports seconds, the API reports hours).

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Convert fractional hours to a microsecond-resolution duration.
pub fn hours(value: f64) -> TimeDelta {
    TimeDelta::microseconds((value * MICROS_PER_HOUR).round() as i64)
}

/// Convert a duration back to fractional hours.
pub fn hours_f64(delta: TimeDelta) -> f64 {
    delta.num_microseconds().unwrap_or(i64::MAX) as f64 / MICROS_PER_HOUR
}

/// A geographical point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A free-flowing route between two locations as reported by the routing
/// oracle, before any HOS planning.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInformation {
    pub distance_miles: f64,
    pub duration_hours: f64,
    /// Route polyline, ordered origin to destination. Never empty.
    pub geometry: Vec<Location>,
}

impl RouteInformation {
    pub fn duration(&self) -> TimeDelta {
        hours(self.duration_hours)
    }
}

/// Duty status of the driver during a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DutyStatus {
    #[serde(rename = "On Duty (Driving)")]
    Driving,
    #[serde(rename = "On Duty (Not Driving)")]
    OnDutyNotDriving,
    #[serde(rename = "Off Duty")]
    OffDuty,
    #[serde(rename = "Sleeper Berth")]
    SleeperBerth,
}

impl DutyStatus {
    /// Off-duty and sleeper-berth time both count as rest in trip totals.
    pub fn is_rest(self) -> bool {
        matches!(self, DutyStatus::OffDuty | DutyStatus::SleeperBerth)
    }
}

/// Kind of activity a segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    DriveToPickup,
    DriveToDropOff,
    MandatoryDrivingBreak,
    DailyRest,
    CycleRestart,
    Fueling,
    Pickup,
    DropOff,
}

/// A contiguous interval of a single duty state in the final plan.
///
/// Consecutive segments of a plan cover the trip without gaps or overlaps:
/// each segment starts exactly where and when the previous one ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: SegmentType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: f64,
    /// Zero for every non-driving segment.
    pub distance_miles: f64,
    pub status: DutyStatus,
    pub start_coordinates: Location,
    pub end_coordinates: Location,
    /// Optional human label for the stop ("30 min break", pickup name, ...).
    pub location: Option<String>,
}

impl Segment {
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }
}

/// The fully planned, HOS-compliant trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub segments: Vec<Segment>,
    pub total_distance_miles: f64,
    pub total_duration_hours: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Leg geometries concatenated, duplicate junction point removed.
    pub route_geometry: Vec<Location>,
    pub driving_time_hours: f64,
    pub resting_time_hours: f64,
}
