//! Nominatim geocoding client

use anyhow::{Context, Result};
use serde::Deserialize;
use crate::types::Coordinates;

/// Nominatim API response
#[derive(Debug, Deserialize)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

/// Geocoded place
#[derive(Debug, Clone)]
pub struct NominatimPlace {
    pub coordinates: Coordinates,
    pub display_name: String,
}

/// Nominatim geocoding client
pub struct NominatimClient {
    base_url: String,
    client: reqwest::Client,
}

impl NominatimClient {
    /// Create a new client
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Truckline/1.0 (https://truckline.app)")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.to_string(),
            client,
        }
    }

    /// Geocode a free-form place name ("Chicago, IL") to coordinates
    pub async fn geocode(&self, location: &str) -> Result<Option<NominatimPlace>> {
        let url = format!(
            "{}/search?q={}&format=json&countrycodes=us&limit=1",
            self.base_url,
            urlencoding::encode(location)
        );

        let response = self.client
            .get(&url)
            .send()
            .await
            .context("Failed to send geocoding request")?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .context("Failed to parse geocoding response")?;

        if let Some(result) = results.first() {
            let lat: f64 = result.lat.parse().context("Invalid latitude")?;
            let lng: f64 = result.lon.parse().context("Invalid longitude")?;

            Ok(Some(NominatimPlace {
                coordinates: Coordinates { lat, lng },
                display_name: result.display_name.clone(),
            }))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests require network access and hit the public Nominatim API
    // They are marked as ignored by default

    #[tokio::test]
    #[ignore]
    async fn test_geocode_chicago() {
        let client = NominatimClient::new("https://nominatim.openstreetmap.org");

        let result = client.geocode("Chicago, IL").await.unwrap();

        assert!(result.is_some());
        let place = result.unwrap();

        // Chicago is around 41.88°N, 87.63°W
        assert!((place.coordinates.lat - 41.88).abs() < 0.2);
        assert!((place.coordinates.lng + 87.63).abs() < 0.2);
    }
}
