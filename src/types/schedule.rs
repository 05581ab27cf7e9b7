//! Schedule types

use serde::{Deserialize, Serialize};

/// Coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Activity performed during a schedule segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    DrivingToPickup,
    DrivingToDropoff,
    Pickup,
    Dropoff,
    RequiredBreak,
    RequiredRest,
    FuelStop,
}

impl Activity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Activity::DrivingToPickup => "driving_to_pickup",
            Activity::DrivingToDropoff => "driving_to_dropoff",
            Activity::Pickup => "pickup",
            Activity::Dropoff => "dropoff",
            Activity::RequiredBreak => "required_break",
            Activity::RequiredRest => "required_rest",
            Activity::FuelStop => "fuel_stop",
        }
    }

    /// Whether miles are accumulated during this activity
    pub const fn is_driving(self) -> bool {
        matches!(self, Activity::DrivingToPickup | Activity::DrivingToDropoff)
    }
}

/// Duty status category used for HOS accounting and log rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    Driving,
    OnDuty,
    OffDuty,
    SleeperBerth,
}

impl DutyStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            DutyStatus::Driving => "driving",
            DutyStatus::OnDuty => "on_duty",
            DutyStatus::OffDuty => "off_duty",
            DutyStatus::SleeperBerth => "sleeper_berth",
        }
    }

    /// Off-duty and sleeper-berth time does not count against the 14-hour window
    pub const fn counts_toward_on_duty(self) -> bool {
        matches!(self, DutyStatus::Driving | DutyStatus::OnDuty)
    }
}

/// One time-stamped activity segment of a trip schedule.
///
/// Segments are immutable once emitted; the fuel-stop post-processor produces
/// new segment values rather than mutating in place. Times are hours-of-day
/// in [0, 24]; `end_time = start_time + duration` except when a rest is
/// clipped at the midnight boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSegment {
    pub activity: Activity,
    pub status: DutyStatus,
    /// 0-based trip day; advances only when a required rest ends the day
    pub day: u32,
    pub start_time: f64,
    pub end_time: f64,
    /// Duration in hours, always > 0
    pub duration: f64,
    /// Miles attributed to this segment; nonzero only while driving
    pub distance_covered: f64,
}

impl ScheduleSegment {
    /// Segment pinned to a day position, with `end_time` clipped to midnight.
    pub fn new(
        activity: Activity,
        status: DutyStatus,
        day: u32,
        start_time: f64,
        duration: f64,
        distance_covered: f64,
    ) -> Self {
        Self {
            activity,
            status,
            day,
            start_time,
            end_time: (start_time + duration).min(24.0),
            duration,
            distance_covered,
        }
    }
}

/// A located rest stop along the route polyline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestStop {
    pub location: Coordinates,
    pub distance_from_start: f64,
}
