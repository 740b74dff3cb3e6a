//! The HOS driver-clock state machine.
//!
//! One clock exists per trip request. Planners mutate it exclusively through
//! the `record_*` methods and read the remaining budgets through the
//! `*_budget` queries; every mutation advances wall-clock time and re-checks
//! the regulatory invariants.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::hos::RuleSet;
use crate::models::{hours, hours_f64, DutyStatus};

#[derive(Debug, Clone)]
pub struct DriverClock {
    rules: &'static RuleSet,
    driving_in_shift: TimeDelta,
    on_duty_in_shift: TimeDelta,
    driving_since_break: TimeDelta,
    cycle_used: TimeDelta,
    miles_since_fuel: f64,
    now: DateTime<Utc>,
    status: DutyStatus,
}

impl DriverClock {
    /// A fresh clock at `start`, with `cycle_used_hours` already spent of the
    /// rolling 8-day cycle and every shift counter at zero.
    pub fn new(rules: &'static RuleSet, cycle_used_hours: f64, start: DateTime<Utc>) -> Self {
        let clock = Self {
            rules,
            driving_in_shift: TimeDelta::zero(),
            on_duty_in_shift: TimeDelta::zero(),
            driving_since_break: TimeDelta::zero(),
            cycle_used: hours(cycle_used_hours),
            miles_since_fuel: 0.0,
            now: start,
            status: DutyStatus::OffDuty,
        };
        clock.check_invariants();
        clock
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn status(&self) -> DutyStatus {
        self.status
    }

    /// Driving time left before the 11-hour rule closes the shift.
    pub fn drive_budget(&self) -> TimeDelta {
        self.rules.max_driving() - self.driving_in_shift
    }

    /// On-duty time left in the 14-hour window.
    pub fn window_budget(&self) -> TimeDelta {
        self.rules.max_on_duty_window() - self.on_duty_in_shift
    }

    /// Driving time left before the 30-minute break is due.
    pub fn break_budget(&self) -> TimeDelta {
        self.rules.driving_before_break() - self.driving_since_break
    }

    /// On-duty time left in the rolling 8-day cycle.
    pub fn cycle_budget(&self) -> TimeDelta {
        self.rules.max_cycle() - self.cycle_used
    }

    /// Miles left until the next fuel stop is due.
    pub fn miles_until_fuel(&self) -> f64 {
        self.rules.fuel_interval_miles - self.miles_since_fuel
    }

    pub fn cycle_used_hours(&self) -> f64 {
        hours_f64(self.cycle_used)
    }

    /// Record a driving stretch. Driving consumes the shift, window, break,
    /// and cycle budgets and accumulates miles toward the fuel interval.
    pub fn record_drive(&mut self, duration: TimeDelta, miles: f64) {
        self.driving_in_shift += duration;
        self.on_duty_in_shift += duration;
        self.driving_since_break += duration;
        self.cycle_used += duration;
        self.miles_since_fuel += miles;
        self.now += duration;
        self.status = DutyStatus::Driving;
        debug!(
            driving_hours = hours_f64(self.driving_in_shift),
            on_duty_hours = hours_f64(self.on_duty_in_shift),
            miles_since_fuel = self.miles_since_fuel,
            "recorded driving stretch"
        );
        self.check_invariants();
    }

    /// Record the 30-minute driving break. Off duty; only the break counter
    /// resets.
    pub fn record_break(&mut self) -> TimeDelta {
        let duration = self.rules.mandatory_break();
        self.driving_since_break = TimeDelta::zero();
        self.now += duration;
        self.status = DutyStatus::OffDuty;
        self.check_invariants();
        duration
    }

    /// Record the 10-hour daily rest. Resets the shift, window, and break
    /// counters; the cycle total persists.
    pub fn record_daily_rest(&mut self) -> TimeDelta {
        let duration = self.rules.min_rest();
        self.driving_in_shift = TimeDelta::zero();
        self.on_duty_in_shift = TimeDelta::zero();
        self.driving_since_break = TimeDelta::zero();
        self.now += duration;
        self.status = DutyStatus::SleeperBerth;
        self.check_invariants();
        duration
    }

    /// Record the 34-hour restart. Resets the cycle and every shift counter.
    pub fn record_restart(&mut self) -> TimeDelta {
        let duration = self.rules.restart();
        self.cycle_used = TimeDelta::zero();
        self.driving_in_shift = TimeDelta::zero();
        self.on_duty_in_shift = TimeDelta::zero();
        self.driving_since_break = TimeDelta::zero();
        self.now += duration;
        self.status = DutyStatus::OffDuty;
        self.check_invariants();
        duration
    }

    /// Record a fuel stop. On duty but not driving: consumes the window and
    /// cycle, leaves the driving and break counters alone, and restarts the
    /// fuel interval.
    pub fn record_fuel_stop(&mut self) -> TimeDelta {
        let duration = self.rules.fuel_stop();
        self.on_duty_in_shift += duration;
        self.cycle_used += duration;
        self.miles_since_fuel = 0.0;
        self.now += duration;
        self.status = DutyStatus::OnDutyNotDriving;
        self.check_invariants();
        duration
    }

    /// Record an on-duty-not-driving activity (pickup or drop-off).
    pub fn record_activity(&mut self, duration: TimeDelta) {
        self.on_duty_in_shift += duration;
        self.cycle_used += duration;
        self.now += duration;
        self.status = DutyStatus::OnDutyNotDriving;
        self.check_invariants();
    }

    fn check_invariants(&self) {
        debug_assert!(self.driving_in_shift >= TimeDelta::zero());
        debug_assert!(self.driving_in_shift <= self.rules.max_driving());
        debug_assert!(self.on_duty_in_shift >= TimeDelta::zero());
        debug_assert!(self.on_duty_in_shift <= self.rules.max_on_duty_window());
        debug_assert!(self.driving_since_break >= TimeDelta::zero());
        debug_assert!(self.driving_since_break <= self.rules.driving_before_break());
        debug_assert!(self.cycle_used >= TimeDelta::zero());
        debug_assert!(self.cycle_used <= self.rules.max_cycle());
    }
}
