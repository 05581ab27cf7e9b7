//! Road routing for trip legs
//!
//! Production uses OSRM with an OpenRouteService fallback; the geodesic
//! estimator is the last resort and the test backend. All backends return
//! the same `RouteLeg` shape so the planner never knows which one answered.

mod ors;
mod osrm;

pub use ors::{OrsClient, OrsConfig};
pub use osrm::{OsrmClient, OsrmConfig};

use async_trait::async_trait;
use anyhow::Result;
use tracing::{info, warn};

use crate::services::geo::{haversine_miles, interpolate_waypoints};
use crate::types::Coordinates;

/// One routed leg between two points
#[derive(Debug, Clone)]
pub struct RouteLeg {
    /// Road distance in miles
    pub distance_miles: f64,
    /// Estimated travel time in hours
    pub duration_hours: f64,
    /// Route polyline, ordered from start to end
    pub waypoints: Vec<Coordinates>,
}

/// Routing service trait for abstraction (OSRM, ORS, geodesic, mock)
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Compute the road route from one point to another
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<RouteLeg>;

    /// Get service name for logging
    fn name(&self) -> &str;
}

/// Number of synthetic waypoints interpolated by the geodesic fallback
const GEODESIC_WAYPOINT_SEGMENTS: usize = 20;

/// Geodesic routing estimate
///
/// Straight-line haversine distance scaled by a road coefficient, travel
/// time at a fixed average speed, and an interpolated polyline. Used both as
/// the final fallback and as the deterministic test backend.
pub struct GeodesicRouting {
    /// Coefficient for converting straight-line to road distance
    road_coefficient: f64,
    /// Average speed in mph for time estimation
    average_speed_mph: f64,
}

impl Default for GeodesicRouting {
    fn default() -> Self {
        Self {
            road_coefficient: 1.3,
            average_speed_mph: 55.0,
        }
    }
}

impl GeodesicRouting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(road_coefficient: f64, average_speed_mph: f64) -> Self {
        Self {
            road_coefficient,
            average_speed_mph,
        }
    }
}

#[async_trait]
impl RoutingService for GeodesicRouting {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<RouteLeg> {
        let distance_miles = haversine_miles(&from, &to) * self.road_coefficient;
        Ok(RouteLeg {
            distance_miles,
            duration_hours: distance_miles / self.average_speed_mph,
            waypoints: interpolate_waypoints(&from, &to, GEODESIC_WAYPOINT_SEGMENTS),
        })
    }

    fn name(&self) -> &str {
        "Geodesic"
    }
}

/// Routing chain: OSRM, then ORS when an API key is configured, then the
/// geodesic estimate. Never fails; the geodesic floor always answers.
pub struct FallbackRouting {
    osrm: OsrmClient,
    ors: Option<OrsClient>,
    geodesic: GeodesicRouting,
}

impl FallbackRouting {
    pub fn new(osrm: OsrmClient, ors: Option<OrsClient>, geodesic: GeodesicRouting) -> Self {
        Self { osrm, ors, geodesic }
    }
}

#[async_trait]
impl RoutingService for FallbackRouting {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<RouteLeg> {
        match self.osrm.route(from, to).await {
            Ok(leg) => return Ok(leg),
            Err(e) => warn!("OSRM routing failed: {}. Trying next backend.", e),
        }

        if let Some(ors) = &self.ors {
            match ors.route(from, to).await {
                Ok(leg) => return Ok(leg),
                Err(e) => warn!("ORS routing failed: {}. Trying next backend.", e),
            }
        }

        info!("Using geodesic fallback routing");
        self.geodesic.route(from, to).await
    }

    fn name(&self) -> &str {
        "Fallback(OSRM/ORS/Geodesic)"
    }
}

/// Routing configuration shared by the HTTP backends
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Base URL of the OSRM server
    pub osrm_url: String,
    /// OpenRouteService API key; ORS is skipped when absent
    pub ors_api_key: Option<String>,
    /// Request timeout in seconds, applied per backend attempt
    pub timeout_seconds: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            osrm_url: "https://router.project-osrm.org".to_string(),
            ors_api_key: None,
            timeout_seconds: 10,
        }
    }
}

/// Create routing service based on ROUTING_BACKEND environment variable
///
/// - "mock" → GeodesicRouting (tests, development)
/// - anything else → FallbackRouting over the configured backends
pub fn create_routing_service(config: &RoutingConfig) -> Box<dyn RoutingService> {
    let backend = std::env::var("ROUTING_BACKEND").unwrap_or_default();
    if backend == "mock" {
        info!("Using geodesic mock routing");
        return Box::new(GeodesicRouting::new());
    }

    let osrm = OsrmClient::new(OsrmConfig {
        base_url: config.osrm_url.clone(),
        timeout_seconds: config.timeout_seconds,
    });
    let ors = config.ors_api_key.as_ref().map(|key| {
        OrsClient::new(OrsConfig {
            api_key: key.clone(),
            timeout_seconds: config.timeout_seconds,
            ..Default::default()
        })
    });

    info!(
        "Routing chain ready: OSRM at {}, ORS {}",
        config.osrm_url,
        if ors.is_some() { "configured" } else { "not configured" }
    );
    Box::new(FallbackRouting::new(osrm, ors, GeodesicRouting::new()))
}

/// Decode an encoded polyline into [lng, lat] pairs.
/// Precision is 5 decimal places for OSRM/ORS/Google polylines.
pub(crate) fn decode_polyline(encoded: &str, precision: u32) -> Result<Vec<[f64; 2]>> {
    let factor = 10_f64.powi(precision as i32);
    let mut coordinates = Vec::new();
    let mut lat = 0i64;
    let mut lng = 0i64;

    let bytes = encoded.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        // Decode latitude
        let mut shift = 0;
        let mut result = 0i64;
        loop {
            if i >= bytes.len() {
                anyhow::bail!("Invalid polyline encoding");
            }
            let byte = bytes[i] as i64 - 63;
            i += 1;
            result |= (byte & 0x1f) << shift;
            shift += 5;
            if byte < 0x20 {
                break;
            }
        }
        let dlat = if result & 1 != 0 {
            !(result >> 1)
        } else {
            result >> 1
        };
        lat += dlat;

        // Decode longitude
        shift = 0;
        result = 0;
        loop {
            if i >= bytes.len() {
                anyhow::bail!("Invalid polyline encoding");
            }
            let byte = bytes[i] as i64 - 63;
            i += 1;
            result |= (byte & 0x1f) << shift;
            shift += 5;
            if byte < 0x20 {
                break;
            }
        }
        let dlng = if result & 1 != 0 {
            !(result >> 1)
        } else {
            result >> 1
        };
        lng += dlng;

        coordinates.push([lng as f64 / factor, lat as f64 / factor]);
    }

    Ok(coordinates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicago() -> Coordinates {
        Coordinates { lat: 41.8781, lng: -87.6298 }
    }

    fn denver() -> Coordinates {
        Coordinates { lat: 39.7392, lng: -104.9903 }
    }

    #[tokio::test]
    async fn test_geodesic_routing_distance_and_duration() {
        let service = GeodesicRouting::new();
        let leg = service.route(chicago(), denver()).await.unwrap();

        // ~920 straight-line miles × 1.3 road coefficient
        assert!(leg.distance_miles > 1100.0 && leg.distance_miles < 1300.0,
            "got {} miles", leg.distance_miles);

        // Duration consistent with the configured 55 mph
        let expected_hours = leg.distance_miles / 55.0;
        assert!((leg.duration_hours - expected_hours).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_geodesic_routing_waypoints_span_route() {
        let service = GeodesicRouting::new();
        let leg = service.route(chicago(), denver()).await.unwrap();

        assert_eq!(leg.waypoints.len(), GEODESIC_WAYPOINT_SEGMENTS + 1);
        assert!((leg.waypoints[0].lat - 41.8781).abs() < 1e-9);
        let last = leg.waypoints.last().unwrap();
        assert!((last.lng - (-104.9903)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_geodesic_routing_custom_params() {
        let service = GeodesicRouting::with_params(1.0, 60.0);
        let leg = service.route(chicago(), denver()).await.unwrap();

        // Without a road coefficient this is the raw haversine distance
        assert!(leg.distance_miles > 880.0 && leg.distance_miles < 960.0,
            "got {} miles", leg.distance_miles);
        assert!((leg.duration_hours - leg.distance_miles / 60.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fallback_reaches_geodesic_when_backends_unreachable() {
        let osrm = OsrmClient::new(OsrmConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 1,
        });
        let service = FallbackRouting::new(osrm, None, GeodesicRouting::new());

        let leg = service.route(chicago(), denver()).await.unwrap();
        assert!(leg.distance_miles > 0.0);
        assert!(!leg.waypoints.is_empty());
    }

    #[test]
    fn test_decode_polyline_known_vector() {
        // Canonical example from the polyline algorithm documentation
        let coords = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@", 5).unwrap();

        assert_eq!(coords.len(), 3);
        // [lng, lat] pairs
        assert!((coords[0][1] - 38.5).abs() < 1e-5);
        assert!((coords[0][0] - (-120.2)).abs() < 1e-5);
        assert!((coords[1][1] - 40.7).abs() < 1e-5);
        assert!((coords[1][0] - (-120.95)).abs() < 1e-5);
        assert!((coords[2][1] - 43.252).abs() < 1e-5);
        assert!((coords[2][0] - (-126.453)).abs() < 1e-5);
    }

    #[test]
    fn test_decode_polyline_empty() {
        let coords = decode_polyline("", 5).unwrap();
        assert!(coords.is_empty());
    }

    #[test]
    fn test_routing_service_names() {
        assert_eq!(GeodesicRouting::new().name(), "Geodesic");
    }
}
