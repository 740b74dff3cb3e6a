//! Pickup and drop-off activity planning.
//!
//! Activities are on-duty-not-driving time: they consume the 14-hour window
//! and the 70-hour cycle but neither the driving nor the break counters. An
//! activity that no longer fits the window or the cycle is preceded by the
//! appropriate rest, chosen by the same hierarchy as leg planning.

use crate::models::{DutyStatus, Location, Segment, SegmentType};

use super::clock::DriverClock;
use super::segments::InterstatePlanner;

/// Which stop activity a segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Pickup,
    DropOff,
}

impl ActivityKind {
    fn segment_type(self) -> SegmentType {
        match self {
            ActivityKind::Pickup => SegmentType::Pickup,
            ActivityKind::DropOff => SegmentType::DropOff,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ActivityKind::Pickup => "Pickup",
            ActivityKind::DropOff => "Drop-off",
        }
    }
}

impl InterstatePlanner {
    /// Emit one stop activity at `location`, preceded by a rest when the
    /// clock cannot absorb it.
    pub fn emit_activity(
        &self,
        clock: &mut DriverClock,
        kind: ActivityKind,
        location: Location,
        segments: &mut Vec<Segment>,
    ) {
        let duration = match kind {
            ActivityKind::Pickup => self.rules().pickup_activity(),
            ActivityKind::DropOff => self.rules().drop_off_activity(),
        };

        if clock.cycle_budget() < duration {
            self.push_restart(clock, location, segments);
        } else if clock.window_budget() < duration {
            self.push_daily_rest(clock, location, segments);
        }

        let start_time = clock.now();
        clock.record_activity(duration);
        segments.push(Segment {
            kind: kind.segment_type(),
            start_time,
            end_time: clock.now(),
            duration_hours: crate::models::hours_f64(duration),
            distance_miles: 0.0,
            status: DutyStatus::OnDutyNotDriving,
            start_coordinates: location,
            end_coordinates: location,
            location: Some(kind.label().to_string()),
        });
    }
}
