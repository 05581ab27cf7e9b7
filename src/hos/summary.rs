//! Trip-level aggregates derived from a final schedule.

use serde::{Deserialize, Serialize};

use crate::hos::limits::HosLimits;
use crate::types::{Activity, DutyStatus, ScheduleSegment};

/// Totals reported alongside a planned schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub total_distance_miles: f64,
    pub total_driving_hours: f64,
    /// Trip length measured from the origin instant: `day * 24 + end_time`
    /// of the last segment
    pub total_trip_hours: f64,
    pub total_trip_days: u32,
    pub number_of_rest_stops: usize,
    pub number_of_fuel_stops: usize,
    pub hos_compliant: bool,
    /// Cycle hours consumed including this trip's driving time
    pub cycle_hours_used: f64,
    pub cycle_hours_remaining: f64,
}

impl TripSummary {
    pub fn from_segments(
        segments: &[ScheduleSegment],
        cycle_hours_already_used: f64,
        limits: &HosLimits,
    ) -> Self {
        let total_distance_miles: f64 = segments.iter().map(|s| s.distance_covered).sum();
        let total_driving_hours: f64 = segments
            .iter()
            .filter(|s| s.status == DutyStatus::Driving)
            .map(|s| s.duration)
            .sum();
        let total_trip_hours = segments
            .last()
            .map(|s| f64::from(s.day) * 24.0 + s.end_time)
            .unwrap_or(0.0);
        let total_trip_days = segments.iter().map(|s| s.day).max().map_or(0, |d| d + 1);
        let number_of_rest_stops = segments
            .iter()
            .filter(|s| s.activity == Activity::RequiredRest)
            .count();
        let number_of_fuel_stops = segments
            .iter()
            .filter(|s| s.activity == Activity::FuelStop)
            .count();
        let cycle_hours_used = cycle_hours_already_used + total_driving_hours;

        Self {
            total_distance_miles: round2(total_distance_miles),
            total_driving_hours: round2(total_driving_hours),
            total_trip_hours: round2(total_trip_hours),
            total_trip_days,
            number_of_rest_stops,
            number_of_fuel_stops,
            hos_compliant: true,
            cycle_hours_used: round2(cycle_hours_used),
            cycle_hours_remaining: round2(limits.max_cycle_hours - cycle_hours_used),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
