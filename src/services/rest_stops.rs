//! Rest-stop placement along the route polyline
//!
//! The simulator decides *when* rests happen; this module decides *where*,
//! by mapping the cumulative driving miles at each rest back onto the route
//! waypoints returned by the routing service.

use crate::services::geo::haversine_miles;
use crate::types::{Activity, Coordinates, RestStop, ScheduleSegment};

/// Cumulative driving miles completed before each required rest.
///
/// These are the mileage thresholds fed to [`locate_rest_stops`].
pub fn cumulative_rest_distances(segments: &[ScheduleSegment]) -> Vec<f64> {
    let mut distances = Vec::new();
    let mut cumulative = 0.0;

    for segment in segments {
        if segment.activity == Activity::RequiredRest {
            distances.push(cumulative);
        }
        cumulative += segment.distance_covered;
    }

    distances
}

/// Place one rest stop per mileage threshold.
///
/// Walks consecutive waypoint pairs accumulating geodesic miles and emits a
/// record the first time the running total reaches each threshold.
/// Thresholds beyond the total route distance go unmatched; that is not an
/// error, the caller simply gets fewer stops than thresholds.
pub fn locate_rest_stops(waypoints: &[Coordinates], thresholds: &[f64]) -> Vec<RestStop> {
    let mut rest_stops = Vec::new();
    let mut total_distance = 0.0;
    let mut next_threshold = 0usize;

    for pair in waypoints.windows(2) {
        if next_threshold >= thresholds.len() {
            break;
        }

        total_distance += haversine_miles(&pair[0], &pair[1]);

        while next_threshold < thresholds.len() && total_distance >= thresholds[next_threshold] {
            rest_stops.push(RestStop {
                location: pair[1],
                distance_from_start: total_distance,
            });
            next_threshold += 1;
        }
    }

    rest_stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DutyStatus;

    /// Waypoints marching north along a meridian, ~69.1 miles apart
    fn meridian_waypoints(count: usize) -> Vec<Coordinates> {
        (0..count)
            .map(|i| Coordinates { lat: 35.0 + i as f64, lng: -98.0 })
            .collect()
    }

    fn drive(day: u32, start: f64, hours: f64, miles: f64) -> ScheduleSegment {
        ScheduleSegment::new(
            Activity::DrivingToDropoff,
            DutyStatus::Driving,
            day,
            start,
            hours,
            miles,
        )
    }

    fn rest(day: u32, start: f64) -> ScheduleSegment {
        ScheduleSegment::new(Activity::RequiredRest, DutyStatus::SleeperBerth, day, start, 10.0, 0.0)
    }

    #[test]
    fn test_cumulative_rest_distances() {
        let segments = vec![
            drive(0, 0.0, 8.0, 440.0),
            drive(0, 8.5, 3.0, 165.0),
            rest(0, 11.5),
            drive(1, 0.0, 8.0, 440.0),
            rest(1, 8.0),
            drive(2, 0.0, 2.0, 110.0),
        ];

        let distances = cumulative_rest_distances(&segments);
        assert_eq!(distances, vec![605.0, 1045.0]);
    }

    #[test]
    fn test_no_rests_no_thresholds() {
        let segments = vec![drive(0, 0.0, 4.0, 220.0)];
        assert!(cumulative_rest_distances(&segments).is_empty());
    }

    #[test]
    fn test_locate_rest_stops_empty_thresholds() {
        let stops = locate_rest_stops(&meridian_waypoints(5), &[]);
        assert!(stops.is_empty());
    }

    #[test]
    fn test_locate_single_rest_stop() {
        // Steps of ~69.1 miles: the 100-mile threshold is crossed at the
        // second step (~138.2 cumulative)
        let stops = locate_rest_stops(&meridian_waypoints(5), &[100.0]);

        assert_eq!(stops.len(), 1);
        assert!((stops[0].location.lat - 37.0).abs() < 1e-9);
        assert!((stops[0].distance_from_start - 138.2).abs() < 1.0);
    }

    #[test]
    fn test_thresholds_beyond_route_go_unmatched() {
        // Route total ≈ 276 miles; second threshold is unreachable
        let stops = locate_rest_stops(&meridian_waypoints(5), &[100.0, 5000.0]);
        assert_eq!(stops.len(), 1);
    }

    #[test]
    fn test_two_thresholds_in_one_waypoint_step() {
        // A single long step crosses both thresholds at once
        let waypoints = vec![
            Coordinates { lat: 35.0, lng: -98.0 },
            Coordinates { lat: 38.0, lng: -98.0 },
        ];
        let stops = locate_rest_stops(&waypoints, &[50.0, 100.0]);

        assert_eq!(stops.len(), 2);
        assert!((stops[0].location.lat - 38.0).abs() < 1e-9);
        assert_eq!(stops[0].location.lat, stops[1].location.lat);
    }

    #[test]
    fn test_thresholds_matched_in_order() {
        let stops = locate_rest_stops(&meridian_waypoints(10), &[100.0, 300.0, 500.0]);

        assert_eq!(stops.len(), 3);
        assert!(stops[0].distance_from_start < stops[1].distance_from_start);
        assert!(stops[1].distance_from_start < stops[2].distance_from_start);
    }
}
