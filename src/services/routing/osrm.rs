//! OSRM routing client
//!
//! OSRM route API documentation:
//! https://project-osrm.org/docs/v5.24.0/api/#route-service

use async_trait::async_trait;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::types::Coordinates;
use super::{RouteLeg, RoutingService};

const METERS_PER_MILE: f64 = 1609.344;

/// OSRM client configuration
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of OSRM server (e.g. "https://router.project-osrm.org")
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            timeout_seconds: 10,
        }
    }
}

/// OSRM routing client
pub struct OsrmClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Route endpoint URL for a coordinate pair. OSRM takes lon,lat order.
    fn build_route_url(&self, from: Coordinates, to: Coordinates) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson&steps=false",
            self.config.base_url, from.lng, from.lat, to.lng, to.lat
        )
    }
}

#[async_trait]
impl RoutingService for OsrmClient {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<RouteLeg> {
        let url = self.build_route_url(from, to);
        debug!("Requesting route from OSRM");

        let response = self.client
            .get(&url)
            .send()
            .await
            .context("Failed to send route request to OSRM")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OSRM returned error {}: {}", status, body);
        }

        let route_response: OsrmResponse = response
            .json()
            .await
            .context("Failed to parse OSRM response")?;

        if route_response.code != "Ok" {
            anyhow::bail!("OSRM rejected the request: {}", route_response.code);
        }

        let route = route_response
            .routes
            .into_iter()
            .next()
            .context("OSRM returned no routes")?;

        let waypoints = route
            .geometry
            .coordinates
            .iter()
            // GeoJSON uses [lng, lat] order
            .map(|c| Coordinates { lat: c[1], lng: c[0] })
            .collect::<Vec<_>>();

        debug!("OSRM route: {:.1} km, {} points", route.distance / 1000.0, waypoints.len());

        Ok(RouteLeg {
            distance_miles: route.distance / METERS_PER_MILE,
            duration_hours: route.duration / 3600.0,
            waypoints,
        })
    }

    fn name(&self) -> &str {
        "OSRM"
    }
}

// OSRM API types

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Distance in meters
    distance: f64,
    /// Duration in seconds
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osrm_config_default() {
        let config = OsrmConfig::default();
        assert_eq!(config.base_url, "https://router.project-osrm.org");
        assert_eq!(config.timeout_seconds, 10);
    }

    #[test]
    fn test_build_route_url_is_lon_lat_ordered() {
        let client = OsrmClient::new(OsrmConfig::default());
        let url = client.build_route_url(
            Coordinates { lat: 41.8781, lng: -87.6298 },
            Coordinates { lat: 39.7392, lng: -104.9903 },
        );

        assert!(url.starts_with("https://router.project-osrm.org/route/v1/driving/"));
        assert!(url.contains("-87.6298,41.8781;-104.9903,39.7392"));
        assert!(url.contains("geometries=geojson"));
    }

    #[test]
    fn test_parse_osrm_response() {
        let body = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 160934.4,
                "duration": 7200.0,
                "geometry": {"coordinates": [[-87.63, 41.88], [-88.0, 41.5]]}
            }]
        }"#;
        let parsed: OsrmResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.code, "Ok");
        assert_eq!(parsed.routes.len(), 1);
        // 160934.4 m = 100 miles
        assert!((parsed.routes[0].distance / METERS_PER_MILE - 100.0).abs() < 0.01);
    }

    #[tokio::test]
    #[ignore = "Requires network access to the public OSRM server"]
    async fn test_osrm_integration_chicago_milwaukee() {
        let client = OsrmClient::new(OsrmConfig::default());

        let leg = client
            .route(
                Coordinates { lat: 41.8781, lng: -87.6298 }, // Chicago
                Coordinates { lat: 43.0389, lng: -87.9065 }, // Milwaukee
            )
            .await
            .unwrap();

        // Chicago to Milwaukee is ~92 road miles
        assert!(leg.distance_miles > 80.0 && leg.distance_miles < 110.0,
            "Expected ~92 miles, got {}", leg.distance_miles);
        assert!(leg.waypoints.len() > 10);
    }
}
