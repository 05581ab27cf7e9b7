//! Fuel-stop insertion and schedule re-timing.
//!
//! Walks a simulated schedule in order, inserts a refueling stop each time
//! the accumulated driving miles since the previous stop reach the policy
//! interval, and re-times everything downstream. The input is never mutated;
//! the pass emits new segment values with normalized clocks: every output
//! segment satisfies `start_time <= end_time <= 24`.

use crate::hos::limits::FuelPolicy;
use crate::types::{Activity, DutyStatus, ScheduleSegment};

/// Insert fuel stops into a simulated schedule.
///
/// Fuel time pushes the remainder of the same trip day later; the shift
/// resets at each day boundary, since the rest that closes a day already
/// absorbs the slack (its on-clock end is clipped at midnight) and the next
/// day restarts at hour 0.
pub fn insert_fuel_stops(segments: &[ScheduleSegment], policy: &FuelPolicy) -> Vec<ScheduleSegment> {
    let mut updated = Vec::with_capacity(segments.len());
    let mut total_driving_distance = 0.0;
    let mut last_fuel_distance = 0.0;
    let mut time_shift = 0.0;
    let mut current_day = 0u32;

    for segment in segments {
        if segment.day != current_day {
            current_day = segment.day;
            time_shift = 0.0;
        }

        let shifted = retime(segment, time_shift);
        let shifted_end = shifted.end_time;
        updated.push(shifted);

        if segment.activity.is_driving() {
            total_driving_distance += segment.distance_covered;

            if total_driving_distance - last_fuel_distance >= policy.interval_miles {
                updated.push(ScheduleSegment::new(
                    Activity::FuelStop,
                    DutyStatus::OnDuty,
                    segment.day,
                    shifted_end,
                    policy.stop_duration_hours,
                    0.0,
                ));
                last_fuel_distance = total_driving_distance;
                time_shift += policy.stop_duration_hours;
            }
        }
    }

    updated
}

/// Copy of a segment moved later by `shift` hours, clamped at midnight.
fn retime(segment: &ScheduleSegment, shift: f64) -> ScheduleSegment {
    if shift == 0.0 {
        return segment.clone();
    }
    let start_time = (segment.start_time + shift).min(24.0);
    let end_time = (segment.end_time + shift).min(24.0).max(start_time);
    ScheduleSegment {
        start_time,
        end_time,
        ..segment.clone()
    }
}
