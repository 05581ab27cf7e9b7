//! Configuration management

use anyhow::{self, Result};

use crate::defaults::DEFAULT_AVERAGE_SPEED_MPH;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// Nominatim API URL (for geocoding)
    pub nominatim_url: String,

    /// OSRM routing server URL (primary road router)
    pub osrm_url: String,

    /// OpenRouteService API key (optional secondary router)
    pub ors_api_key: Option<String>,

    /// Per-attempt timeout for routing requests, in seconds
    pub routing_timeout_seconds: u64,

    /// Average truck speed assumed by the schedule simulator, in mph
    pub average_speed_mph: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let nominatim_url = std::env::var("NOMINATIM_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

        let osrm_url = std::env::var("OSRM_URL")
            .unwrap_or_else(|_| "https://router.project-osrm.org".to_string());

        let ors_api_key = std::env::var("ORS_API_KEY").ok().filter(|k| !k.is_empty());

        let routing_timeout_seconds = std::env::var("ROUTING_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let average_speed_mph = std::env::var("AVERAGE_SPEED_MPH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_AVERAGE_SPEED_MPH);

        if average_speed_mph <= 0.0 {
            anyhow::bail!(
                "AVERAGE_SPEED_MPH must be positive (current: {})",
                average_speed_mph
            );
        }

        Ok(Self {
            nats_url,
            nominatim_url,
            osrm_url,
            ors_api_key,
            routing_timeout_seconds,
            average_speed_mph,
        })
    }
}
