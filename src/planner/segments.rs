//! Leg planning: fractures a free-flowing drive into HOS-compliant
//! sub-segments.
//!
//! The planner walks the leg in stretches. Each stretch is bounded by
//! whichever limit is nearest: remaining shift driving, the 14-hour window,
//! the 8-hour break rule, the 70-hour cycle, the fuel interval, or simply the
//! end of the leg. When no driving is possible the most-constraining rest is
//! emitted instead, in the order cycle, daily, break, fuel.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::hos::RuleSet;
use crate::models::{
    hours, hours_f64, DutyStatus, Location, RouteInformation, Segment, SegmentType,
};

use super::clock::DriverClock;
use super::PlanError;

/// Residual miles below which the fuel interval counts as exhausted. Absorbs
/// the float residue of the proportional distance split so a scheduled stop
/// cannot leave a microsecond drive sliver behind.
const FUEL_MILES_EPSILON: f64 = 1e-6;

/// Which leg of the trip a driving segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveKind {
    ToPickup,
    ToDropOff,
}

impl DriveKind {
    fn segment_type(self) -> SegmentType {
        match self {
            DriveKind::ToPickup => SegmentType::DriveToPickup,
            DriveKind::ToDropOff => SegmentType::DriveToDropOff,
        }
    }
}

/// Plans driving legs and stop activities under the interstate rule set.
#[derive(Debug, Clone, Copy)]
pub struct InterstatePlanner {
    rules: &'static RuleSet,
}

impl InterstatePlanner {
    pub fn new(rules: &'static RuleSet) -> Self {
        Self { rules }
    }

    pub(super) fn rules(&self) -> &'static RuleSet {
        self.rules
    }

    /// Emit segments covering the whole leg, honoring every HOS limit.
    ///
    /// Position along the leg advances proportionally to driven time; rest
    /// segments sit at the coordinate reached so far. The final driving
    /// sub-segment consumes the exact remaining distance and ends on the
    /// leg's last geometry point.
    pub fn plan_leg(
        &self,
        clock: &mut DriverClock,
        route: &RouteInformation,
        kind: DriveKind,
        segments: &mut Vec<Segment>,
    ) -> Result<(), PlanError> {
        let total = route.duration();
        if total <= TimeDelta::zero() {
            // Nothing to drive; the clock is left untouched.
            return Ok(());
        }
        if route.geometry.is_empty() {
            return Err(PlanError::Infeasible("leg geometry is empty".into()));
        }
        let average_speed = route.distance_miles / route.duration_hours;

        let mut remaining = total;
        let mut remaining_miles = route.distance_miles;

        while remaining > TimeDelta::zero() {
            let here = point_at(&route.geometry, fraction_driven(total, remaining));

            let drive_budget = clock.drive_budget();
            let window_budget = clock.window_budget();
            let break_budget = clock.break_budget();
            let cycle_budget = clock.cycle_budget();
            let fuel_budget = fuel_budget(clock.miles_until_fuel(), average_speed);

            let stretch = drive_budget
                .min(window_budget)
                .min(break_budget)
                .min(cycle_budget)
                .min(fuel_budget)
                .min(remaining);

            if stretch <= TimeDelta::zero() {
                // No driving possible right now. Emit the most-constraining
                // rest: cycle, then daily, then break, then fuel.
                if cycle_budget <= TimeDelta::zero() {
                    self.push_restart(clock, here, segments);
                } else if drive_budget <= TimeDelta::zero() || window_budget <= TimeDelta::zero() {
                    self.push_daily_rest(clock, here, segments);
                } else if break_budget <= TimeDelta::zero() {
                    self.push_break(clock, here, segments);
                } else if fuel_budget <= TimeDelta::zero() {
                    // A fuel stop spends window and cycle time; rest first
                    // when it no longer fits.
                    if cycle_budget < self.rules.fuel_stop() {
                        self.push_restart(clock, here, segments);
                    } else if window_budget < self.rules.fuel_stop() {
                        self.push_daily_rest(clock, here, segments);
                    } else {
                        self.push_fuel_stop(clock, here, segments);
                    }
                } else {
                    return Err(PlanError::Infeasible(
                        "no driving budget left and no limit to rest away".into(),
                    ));
                }
                continue;
            }

            let miles = if stretch == remaining {
                remaining_miles
            } else {
                hours_f64(stretch) / hours_f64(remaining) * remaining_miles
            };
            let start_time = clock.now();
            clock.record_drive(stretch, miles);
            remaining -= stretch;
            remaining_miles -= miles;

            segments.push(Segment {
                kind: kind.segment_type(),
                start_time,
                end_time: clock.now(),
                duration_hours: hours_f64(stretch),
                distance_miles: miles,
                status: DutyStatus::Driving,
                start_coordinates: here,
                end_coordinates: point_at(&route.geometry, fraction_driven(total, remaining)),
                location: None,
            });
        }

        debug!(
            segment_count = segments.len(),
            end_status = ?clock.status(),
            "leg planned"
        );
        Ok(())
    }

    pub(super) fn push_break(
        &self,
        clock: &mut DriverClock,
        at: Location,
        segments: &mut Vec<Segment>,
    ) {
        let start_time = clock.now();
        let duration = clock.record_break();
        segments.push(pause_segment(
            SegmentType::MandatoryDrivingBreak,
            DutyStatus::OffDuty,
            start_time,
            clock.now(),
            duration,
            at,
            "30 min break",
        ));
    }

    pub(super) fn push_daily_rest(
        &self,
        clock: &mut DriverClock,
        at: Location,
        segments: &mut Vec<Segment>,
    ) {
        let start_time = clock.now();
        let duration = clock.record_daily_rest();
        segments.push(pause_segment(
            SegmentType::DailyRest,
            DutyStatus::SleeperBerth,
            start_time,
            clock.now(),
            duration,
            at,
            "10 hr rest",
        ));
    }

    pub(super) fn push_restart(
        &self,
        clock: &mut DriverClock,
        at: Location,
        segments: &mut Vec<Segment>,
    ) {
        let start_time = clock.now();
        let duration = clock.record_restart();
        segments.push(pause_segment(
            SegmentType::CycleRestart,
            DutyStatus::OffDuty,
            start_time,
            clock.now(),
            duration,
            at,
            "34 hr restart",
        ));
    }

    pub(super) fn push_fuel_stop(
        &self,
        clock: &mut DriverClock,
        at: Location,
        segments: &mut Vec<Segment>,
    ) {
        let start_time = clock.now();
        let duration = clock.record_fuel_stop();
        segments.push(pause_segment(
            SegmentType::Fueling,
            DutyStatus::OnDutyNotDriving,
            start_time,
            clock.now(),
            duration,
            at,
            "Fuel stop",
        ));
    }
}

/// Driving time left before the tank reaches the fuel interval, at this
/// leg's average speed.
fn fuel_budget(miles_until_fuel: f64, average_speed: f64) -> TimeDelta {
    if miles_until_fuel <= FUEL_MILES_EPSILON {
        return TimeDelta::zero();
    }
    hours(miles_until_fuel / average_speed)
}

/// Fraction of the leg already driven, by time.
fn fraction_driven(total: TimeDelta, remaining: TimeDelta) -> f64 {
    hours_f64(total - remaining) / hours_f64(total)
}

/// Nearest geometry point to the given fraction along the leg.
fn point_at(geometry: &[Location], fraction: f64) -> Location {
    let last = geometry.len() - 1;
    let index = (fraction * last as f64).round() as usize;
    geometry[index.min(last)]
}

fn pause_segment(
    kind: SegmentType,
    status: DutyStatus,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    duration: TimeDelta,
    at: Location,
    label: &str,
) -> Segment {
    Segment {
        kind,
        start_time,
        end_time,
        duration_hours: hours_f64(duration),
        distance_miles: 0.0,
        status,
        start_coordinates: at,
        end_coordinates: at,
        location: Some(label.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hos::RuleSetTag;

    fn planner() -> InterstatePlanner {
        InterstatePlanner::new(RuleSet::get(RuleSetTag::Interstate))
    }

    fn fresh_clock(cycle_used: f64) -> DriverClock {
        let start = "2025-01-01T08:00:00Z".parse().unwrap();
        DriverClock::new(RuleSet::get(RuleSetTag::Interstate), cycle_used, start)
    }

    /// Straight line between two points with evenly spaced intermediate
    /// coordinates, endpoints exact.
    fn straight_line(from: Location, to: Location, points: usize) -> Vec<Location> {
        (0..points)
            .map(|i| {
                let t = i as f64 / (points - 1) as f64;
                Location::new(
                    from.latitude + t * (to.latitude - from.latitude),
                    from.longitude + t * (to.longitude - from.longitude),
                )
            })
            .collect()
    }

    fn route(distance_miles: f64, duration_hours: f64) -> RouteInformation {
        let from = Location::new(40.0, -74.0);
        let to = Location::new(41.0, -80.0);
        RouteInformation {
            distance_miles,
            duration_hours,
            geometry: straight_line(from, to, 11),
        }
    }

    fn kinds(segments: &[Segment]) -> Vec<SegmentType> {
        segments.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn zero_duration_leg_emits_nothing() {
        let mut clock = fresh_clock(0.0);
        let mut segments = Vec::new();
        let leg = RouteInformation {
            distance_miles: 0.0,
            duration_hours: 0.0,
            geometry: vec![Location::new(40.0, -74.0)],
        };

        planner()
            .plan_leg(&mut clock, &leg, DriveKind::ToPickup, &mut segments)
            .unwrap();

        assert!(segments.is_empty());
        assert_eq!(clock.drive_budget(), TimeDelta::hours(11));
        assert_eq!(clock.cycle_budget(), TimeDelta::hours(70));
    }

    #[test]
    fn short_leg_is_a_single_drive_segment() {
        let mut clock = fresh_clock(0.0);
        let mut segments = Vec::new();
        let leg = route(100.0, 2.0);

        planner()
            .plan_leg(&mut clock, &leg, DriveKind::ToPickup, &mut segments)
            .unwrap();

        assert_eq!(kinds(&segments), vec![SegmentType::DriveToPickup]);
        let drive = &segments[0];
        assert_eq!(drive.duration_hours, 2.0);
        assert_eq!(drive.distance_miles, 100.0);
        assert_eq!(drive.status, DutyStatus::Driving);
        assert_eq!(drive.start_coordinates, leg.geometry[0]);
        assert_eq!(drive.end_coordinates, *leg.geometry.last().unwrap());
        assert_eq!(drive.end_time - drive.start_time, TimeDelta::hours(2));
    }

    #[test]
    fn break_inserted_after_eight_hours_of_driving() {
        let mut clock = fresh_clock(0.0);
        let mut segments = Vec::new();
        let leg = route(500.0, 9.0);

        planner()
            .plan_leg(&mut clock, &leg, DriveKind::ToPickup, &mut segments)
            .unwrap();

        assert_eq!(
            kinds(&segments),
            vec![
                SegmentType::DriveToPickup,
                SegmentType::MandatoryDrivingBreak,
                SegmentType::DriveToPickup,
            ]
        );
        assert_eq!(segments[0].duration_hours, 8.0);
        assert_eq!(segments[1].duration_hours, 0.5);
        assert_eq!(segments[1].status, DutyStatus::OffDuty);
        assert_eq!(segments[1].distance_miles, 0.0);
        assert_eq!(segments[2].duration_hours, 1.0);
        // Distance is conserved across the split.
        let total: f64 = segments.iter().map(|s| s.distance_miles).sum();
        assert!((total - 500.0).abs() < 1e-6);
    }

    #[test]
    fn daily_rest_inserted_when_the_driving_limit_is_reached() {
        let mut clock = fresh_clock(0.0);
        let mut segments = Vec::new();
        let leg = route(700.0, 13.0);

        planner()
            .plan_leg(&mut clock, &leg, DriveKind::ToDropOff, &mut segments)
            .unwrap();

        assert_eq!(
            kinds(&segments),
            vec![
                SegmentType::DriveToDropOff,
                SegmentType::MandatoryDrivingBreak,
                SegmentType::DriveToDropOff,
                SegmentType::DailyRest,
                SegmentType::DriveToDropOff,
            ]
        );
        assert_eq!(segments[0].duration_hours, 8.0);
        assert_eq!(segments[2].duration_hours, 3.0);
        assert_eq!(segments[3].duration_hours, 10.0);
        assert_eq!(segments[3].status, DutyStatus::SleeperBerth);
        assert_eq!(segments[4].duration_hours, 2.0);
        // The daily rest resets the shift but keeps the cycle total.
        assert_eq!(clock.cycle_budget(), TimeDelta::hours(57));
    }

    #[test]
    fn restart_inserted_when_the_cycle_is_exhausted() {
        let mut clock = fresh_clock(69.0);
        let mut segments = Vec::new();
        let leg = route(100.0, 2.0);

        planner()
            .plan_leg(&mut clock, &leg, DriveKind::ToPickup, &mut segments)
            .unwrap();

        assert_eq!(
            kinds(&segments),
            vec![
                SegmentType::DriveToPickup,
                SegmentType::CycleRestart,
                SegmentType::DriveToPickup,
            ]
        );
        assert_eq!(segments[0].duration_hours, 1.0);
        assert_eq!(segments[1].duration_hours, 34.0);
        assert_eq!(segments[1].status, DutyStatus::OffDuty);
        // Post-restart usage is just the remaining hour of driving.
        assert_eq!(clock.cycle_budget(), TimeDelta::hours(69));
    }

    #[test]
    fn fuel_stop_at_the_interval_mark() {
        let mut clock = fresh_clock(0.0);
        let mut segments = Vec::new();
        let leg = route(1200.0, 20.0);

        planner()
            .plan_leg(&mut clock, &leg, DriveKind::ToPickup, &mut segments)
            .unwrap();

        let fuel_index = segments
            .iter()
            .position(|s| s.kind == SegmentType::Fueling)
            .expect("a fuel stop must be scheduled on a 1200-mile leg");
        assert_eq!(segments[fuel_index].duration_hours, 0.25);
        assert_eq!(segments[fuel_index].status, DutyStatus::OnDutyNotDriving);
        assert_eq!(
            segments[fuel_index].start_coordinates,
            segments[fuel_index].end_coordinates
        );
        let driven_before: f64 = segments[..fuel_index]
            .iter()
            .map(|s| s.distance_miles)
            .sum();
        assert!((driven_before - 1000.0).abs() < 1e-6);
        let total: f64 = segments.iter().map(|s| s.distance_miles).sum();
        assert!((total - 1200.0).abs() < 1e-6);
    }

    #[test]
    fn due_fuel_stop_waits_for_a_rest_when_the_window_cannot_absorb_it() {
        let mut clock = fresh_clock(0.0);
        // Shrink the window so that after 10 driving hours only 0.2 h remain.
        clock.record_activity(hours(3.8));
        let mut segments = Vec::new();
        let leg = route(1100.0, 11.0);

        planner()
            .plan_leg(&mut clock, &leg, DriveKind::ToPickup, &mut segments)
            .unwrap();

        assert_eq!(
            kinds(&segments),
            vec![
                SegmentType::DriveToPickup,
                SegmentType::MandatoryDrivingBreak,
                SegmentType::DriveToPickup,
                SegmentType::DailyRest,
                SegmentType::Fueling,
                SegmentType::DriveToPickup,
            ]
        );
    }

    #[test]
    fn break_takes_precedence_over_fuel_when_both_are_due() {
        let mut clock = fresh_clock(0.0);
        let mut segments = Vec::new();
        // 125 mph average: the 8-hour break rule and the 1000-mile fuel
        // interval land on the same instant.
        let leg = route(1125.0, 9.0);

        planner()
            .plan_leg(&mut clock, &leg, DriveKind::ToPickup, &mut segments)
            .unwrap();

        let break_index = segments
            .iter()
            .position(|s| s.kind == SegmentType::MandatoryDrivingBreak)
            .unwrap();
        let fuel_index = segments
            .iter()
            .position(|s| s.kind == SegmentType::Fueling)
            .unwrap();
        assert!(break_index < fuel_index);
    }

    #[test]
    fn segments_are_contiguous_in_time() {
        let mut clock = fresh_clock(0.0);
        let mut segments = Vec::new();
        let leg = route(700.0, 13.0);

        planner()
            .plan_leg(&mut clock, &leg, DriveKind::ToPickup, &mut segments)
            .unwrap();

        for pair in segments.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
        assert_eq!(segments.last().unwrap().end_time, clock.now());
    }

    #[test]
    fn final_segment_ends_on_the_leg_end_coordinate() {
        let mut clock = fresh_clock(0.0);
        let mut segments = Vec::new();
        let leg = route(700.0, 13.0);

        planner()
            .plan_leg(&mut clock, &leg, DriveKind::ToPickup, &mut segments)
            .unwrap();

        assert_eq!(segments[0].start_coordinates, leg.geometry[0]);
        assert_eq!(
            segments.last().unwrap().end_coordinates,
            *leg.geometry.last().unwrap()
        );
    }
}
