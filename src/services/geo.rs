//! Geographic calculations

use crate::types::Coordinates;

/// Earth radius in miles
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Calculate Haversine distance between two points in miles
pub fn haversine_miles(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Evenly interpolated waypoints between two points (inclusive of both ends).
///
/// Used by the geodesic routing fallback so downstream consumers still get a
/// polyline to place rest stops on.
pub fn interpolate_waypoints(from: &Coordinates, to: &Coordinates, segments: usize) -> Vec<Coordinates> {
    let segments = segments.max(1);
    let mut waypoints = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let ratio = i as f64 / segments as f64;
        waypoints.push(Coordinates {
            lat: from.lat + (to.lat - from.lat) * ratio,
            lng: from.lng + (to.lng - from.lng) * ratio,
        });
    }
    waypoints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        let a = Coordinates { lat: 40.0, lng: -95.0 };
        let b = Coordinates { lat: 41.0, lng: -95.0 };

        // One degree of latitude is ~69.1 miles
        let distance = haversine_miles(&a, &b);
        assert!((distance - 69.1).abs() < 0.5, "got {distance}");
    }

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinates { lat: 41.88, lng: -87.63 };
        assert!(haversine_miles(&point, &point).abs() < 0.001);
    }

    #[test]
    fn test_haversine_chicago_denver() {
        let chicago = Coordinates { lat: 41.8781, lng: -87.6298 };
        let denver = Coordinates { lat: 39.7392, lng: -104.9903 };

        // Straight-line Chicago to Denver is roughly 920 miles
        let distance = haversine_miles(&chicago, &denver);
        assert!(distance > 880.0 && distance < 960.0, "got {distance}");
    }

    #[test]
    fn test_interpolate_waypoints_endpoints_and_count() {
        let from = Coordinates { lat: 41.0, lng: -90.0 };
        let to = Coordinates { lat: 39.0, lng: -104.0 };

        let points = interpolate_waypoints(&from, &to, 20);
        assert_eq!(points.len(), 21);
        assert!((points[0].lat - from.lat).abs() < 1e-9);
        assert!((points[20].lng - to.lng).abs() < 1e-9);

        // Midpoint sits halfway in both coordinates
        assert!((points[10].lat - 40.0).abs() < 1e-9);
        assert!((points[10].lng - (-97.0)).abs() < 1e-9);
    }
}
