//! Hours-of-Service rule tables.
//!
//! Pure data: numeric limits keyed by a rule-set tag. Only the interstate
//! property-carrying rule set is registered; keeping the numbers here keeps
//! the policy testable in isolation from the planner.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use thiserror::Error;

use crate::models::hours;

/// Identifier for a registered HOS rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSetTag {
    Interstate,
}

impl fmt::Display for RuleSetTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSetTag::Interstate => f.write_str("INTERSTATE"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown rule set: {0}")]
pub struct UnknownRuleSet(pub String);

impl FromStr for RuleSetTag {
    type Err = UnknownRuleSet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INTERSTATE" => Ok(RuleSetTag::Interstate),
            other => Err(UnknownRuleSet(other.to_string())),
        }
    }
}

/// Numeric limits of one HOS rule set. Hour values are fractional hours;
/// the planner converts to durations through the accessor methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleSet {
    /// Maximum driving hours per shift (11-hour rule).
    pub max_driving_hours: f64,
    /// Maximum on-duty hours per shift (14-hour window).
    pub max_on_duty_window_hours: f64,
    /// Driving hours allowed before a mandatory break (8-hour rule).
    pub driving_before_break_hours: f64,
    /// Length of the mandatory driving break.
    pub mandatory_break_hours: f64,
    /// Maximum on-duty hours over the rolling 8-day cycle.
    pub max_cycle_hours: f64,
    /// Length of the daily rest that resets the shift.
    pub min_rest_hours: f64,
    /// Length of the restart that resets the cycle.
    pub restart_hours: f64,
    /// Miles between fuel stops.
    pub fuel_interval_miles: f64,
    /// Length of a fuel stop.
    pub fuel_stop_hours: f64,
    pub pickup_activity_hours: f64,
    pub drop_off_activity_hours: f64,
}

/// FMCSA limits for interstate property-carrying drivers.
pub const INTERSTATE: RuleSet = RuleSet {
    max_driving_hours: 11.0,
    max_on_duty_window_hours: 14.0,
    driving_before_break_hours: 8.0,
    mandatory_break_hours: 0.5,
    max_cycle_hours: 70.0,
    min_rest_hours: 10.0,
    restart_hours: 34.0,
    fuel_interval_miles: 1000.0,
    fuel_stop_hours: 0.25,
    pickup_activity_hours: 1.0,
    drop_off_activity_hours: 1.0,
};

impl RuleSet {
    /// Look up the rule set registered under `tag`.
    pub fn get(tag: RuleSetTag) -> &'static RuleSet {
        match tag {
            RuleSetTag::Interstate => &INTERSTATE,
        }
    }

    pub fn max_driving(&self) -> TimeDelta {
        hours(self.max_driving_hours)
    }

    pub fn max_on_duty_window(&self) -> TimeDelta {
        hours(self.max_on_duty_window_hours)
    }

    pub fn driving_before_break(&self) -> TimeDelta {
        hours(self.driving_before_break_hours)
    }

    pub fn mandatory_break(&self) -> TimeDelta {
        hours(self.mandatory_break_hours)
    }

    pub fn max_cycle(&self) -> TimeDelta {
        hours(self.max_cycle_hours)
    }

    pub fn min_rest(&self) -> TimeDelta {
        hours(self.min_rest_hours)
    }

    pub fn restart(&self) -> TimeDelta {
        hours(self.restart_hours)
    }

    pub fn fuel_stop(&self) -> TimeDelta {
        hours(self.fuel_stop_hours)
    }

    pub fn pickup_activity(&self) -> TimeDelta {
        hours(self.pickup_activity_hours)
    }

    pub fn drop_off_activity(&self) -> TimeDelta {
        hours(self.drop_off_activity_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interstate_limits() {
        let rules = RuleSet::get(RuleSetTag::Interstate);
        assert_eq!(rules.max_driving_hours, 11.0);
        assert_eq!(rules.max_on_duty_window_hours, 14.0);
        assert_eq!(rules.driving_before_break_hours, 8.0);
        assert_eq!(rules.max_cycle_hours, 70.0);
        assert_eq!(rules.fuel_interval_miles, 1000.0);
        assert_eq!(rules.mandatory_break(), TimeDelta::minutes(30));
        assert_eq!(rules.restart(), TimeDelta::hours(34));
        assert_eq!(rules.fuel_stop(), TimeDelta::minutes(15));
    }

    #[test]
    fn tag_parses_case_insensitively() {
        assert_eq!("INTERSTATE".parse::<RuleSetTag>().unwrap(), RuleSetTag::Interstate);
        assert_eq!("interstate".parse::<RuleSetTag>().unwrap(), RuleSetTag::Interstate);
    }

    #[test]
    fn unregistered_tag_is_rejected() {
        let err = "INTRASTATE".parse::<RuleSetTag>().unwrap_err();
        assert_eq!(err.to_string(), "unknown rule set: INTRASTATE");
    }
}
