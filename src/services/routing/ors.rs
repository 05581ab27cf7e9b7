//! OpenRouteService routing client
//!
//! ORS directions API documentation:
//! https://openrouteservice.org/dev/#/api-docs/v2/directions

use async_trait::async_trait;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Coordinates;
use super::{decode_polyline, RouteLeg, RoutingService};

const METERS_PER_MILE: f64 = 1609.344;

/// ORS client configuration
#[derive(Debug, Clone)]
pub struct OrsConfig {
    /// Base URL of the ORS API
    pub base_url: String,
    /// API key sent in the Authorization header
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: String::new(),
            timeout_seconds: 10,
        }
    }
}

/// OpenRouteService routing client
pub struct OrsClient {
    client: Client,
    config: OrsConfig,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn build_request(&self, from: Coordinates, to: Coordinates) -> DirectionsRequest {
        // ORS takes [lng, lat] pairs
        DirectionsRequest {
            coordinates: vec![[from.lng, from.lat], [to.lng, to.lat]],
        }
    }
}

#[async_trait]
impl RoutingService for OrsClient {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<RouteLeg> {
        let url = format!("{}/v2/directions/driving-car", self.config.base_url);
        let request = self.build_request(from, to);

        debug!("Requesting route from ORS");

        let response = self.client
            .post(&url)
            .header("Authorization", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send route request to ORS")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("ORS returned error {}: {}", status, body);
        }

        let directions: DirectionsResponse = response
            .json()
            .await
            .context("Failed to parse ORS response")?;

        let route = directions
            .routes
            .into_iter()
            .next()
            .context("ORS returned no routes")?;

        // ORS ships geometry as an encoded polyline at precision 5
        let waypoints = decode_polyline(&route.geometry, 5)?
            .iter()
            .map(|c| Coordinates { lat: c[1], lng: c[0] })
            .collect::<Vec<_>>();

        debug!("ORS route: {:.1} km, {} points", route.summary.distance / 1000.0, waypoints.len());

        Ok(RouteLeg {
            distance_miles: route.summary.distance / METERS_PER_MILE,
            duration_hours: route.summary.duration / 3600.0,
            waypoints,
        })
    }

    fn name(&self) -> &str {
        "ORS"
    }
}

// ORS API types

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<OrsRoute>,
}

#[derive(Debug, Deserialize)]
struct OrsRoute {
    summary: OrsSummary,
    /// Encoded polyline
    geometry: String,
}

#[derive(Debug, Deserialize)]
struct OrsSummary {
    /// Distance in meters
    distance: f64,
    /// Duration in seconds
    duration: f64,
}
