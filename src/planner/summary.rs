//! Trip summary: a pure fold over the planned segments.

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::{hours_f64, DutyStatus, Location, RoutePlan, Segment};

/// Fold the segment list into trip totals and merge the leg geometries.
pub fn summarize(
    segments: Vec<Segment>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    to_pickup_geometry: &[Location],
    to_drop_off_geometry: &[Location],
) -> RoutePlan {
    let total_distance_miles = segments.iter().map(|s| s.distance_miles).sum();

    let driving = segments
        .iter()
        .filter(|s| s.status == DutyStatus::Driving)
        .fold(TimeDelta::zero(), |acc, s| acc + s.duration());
    let resting = segments
        .iter()
        .filter(|s| s.status.is_rest())
        .fold(TimeDelta::zero(), |acc, s| acc + s.duration());

    RoutePlan {
        segments,
        total_distance_miles,
        total_duration_hours: hours_f64(end_time - start_time),
        start_time,
        end_time,
        route_geometry: merge_geometries(to_pickup_geometry, to_drop_off_geometry),
        driving_time_hours: hours_f64(driving),
        resting_time_hours: hours_f64(resting),
    }
}

/// Concatenate two leg geometries, dropping the duplicated junction point.
pub fn merge_geometries(first: &[Location], second: &[Location]) -> Vec<Location> {
    let mut merged = first.to_vec();
    match second.first() {
        Some(junction) if merged.last() == Some(junction) => {
            merged.extend_from_slice(&second[1..]);
        }
        _ => merged.extend_from_slice(second),
    }
    merged
}
