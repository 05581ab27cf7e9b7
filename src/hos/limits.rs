//! Hours-of-Service rule limits
//!
//! The numeric thresholds are carried as an injectable policy struct rather
//! than constants so alternate rule sets (e.g. passenger-carrying) can be
//! simulated without code changes.

use serde::{Deserialize, Serialize};

/// HOS rule set for a trip simulation.
///
/// Defaults to the U.S. property-carrying 70-hour/8-day rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HosLimits {
    /// Maximum driving hours per day (11-hour rule)
    pub max_driving_hours: f64,
    /// Maximum on-duty hours per day (14-hour window)
    pub max_on_duty_hours: f64,
    /// Total hours available in the rolling cycle (70-hour rule)
    pub max_cycle_hours: f64,
    /// Length of the rolling cycle window in days. Informational; the cycle
    /// is modeled as a single hour budget, not a sliding window.
    pub cycle_days: u32,
    /// Driving hours allowed since the last break (8-hour rule)
    pub continuous_driving_hours: f64,
    /// Duration of the mandatory 30-minute break
    pub required_break_hours: f64,
    /// Duration of the mandatory off-duty rest
    pub required_off_duty_hours: f64,
    /// Rest-day layout. `true`: a forced rest is a 10-hour sleeper-berth
    /// block followed by an off-duty remainder padding the day to midnight.
    /// `false`: a single off-duty rest block.
    pub split_day_on_rest: bool,
}

impl HosLimits {
    /// U.S. property-carrying 70/8 rule set
    pub fn property_carrying() -> Self {
        Self {
            max_driving_hours: 11.0,
            max_on_duty_hours: 14.0,
            max_cycle_hours: 70.0,
            cycle_days: 8,
            continuous_driving_hours: 8.0,
            required_break_hours: 0.5,
            required_off_duty_hours: 10.0,
            split_day_on_rest: true,
        }
    }

    pub fn with_single_rest_block(mut self) -> Self {
        self.split_day_on_rest = false;
        self
    }
}

impl Default for HosLimits {
    fn default() -> Self {
        Self::property_carrying()
    }
}

/// Refueling policy applied by the fuel-stop post-processor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelPolicy {
    /// Driving miles between refueling stops
    pub interval_miles: f64,
    /// Time spent at each fuel stop, in hours
    pub stop_duration_hours: f64,
}

impl Default for FuelPolicy {
    fn default() -> Self {
        Self {
            interval_miles: 1000.0,
            stop_duration_hours: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_carrying_defaults() {
        let limits = HosLimits::default();
        assert_eq!(limits.max_driving_hours, 11.0);
        assert_eq!(limits.max_on_duty_hours, 14.0);
        assert_eq!(limits.max_cycle_hours, 70.0);
        assert_eq!(limits.cycle_days, 8);
        assert_eq!(limits.continuous_driving_hours, 8.0);
        assert_eq!(limits.required_break_hours, 0.5);
        assert_eq!(limits.required_off_duty_hours, 10.0);
        assert!(limits.split_day_on_rest);
    }

    #[test]
    fn test_single_rest_block_variant() {
        let limits = HosLimits::default().with_single_rest_block();
        assert!(!limits.split_day_on_rest);
        assert_eq!(limits.max_driving_hours, 11.0);
    }

    #[test]
    fn test_fuel_policy_defaults() {
        let policy = FuelPolicy::default();
        assert_eq!(policy.interval_miles, 1000.0);
        assert_eq!(policy.stop_duration_hours, 0.5);
    }
}
