//! Geocoding abstraction layer with safety features
//!
//! This module provides a safe geocoding architecture that:
//! - Never risks getting blocked by external services
//! - Uses MockGeocoder for tests (deterministic, no network)
//! - Uses RateLimitedGeocoder for production (strict rate limiting)
//!
//! Configuration via GEOCODER_BACKEND env variable:
//! - "mock" → MockGeocoder (tests, development)
//! - "nominatim" → RateLimitedNominatimGeocoder (production)

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::services::nominatim::NominatimClient;
use crate::types::Coordinates;

/// Geocoder trait - abstraction for all geocoding implementations
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocode a free-form place name to coordinates
    /// Returns None if the location cannot be geocoded
    async fn geocode(&self, location: &str) -> Result<Option<GeocodingResult>>;

    /// Get the name of this geocoder implementation
    fn name(&self) -> &'static str;
}

/// Result of geocoding operation
#[derive(Debug, Clone)]
pub struct GeocodingResult {
    /// Latitude and longitude
    pub coordinates: Coordinates,
    /// Confidence score 0.0-1.0
    pub confidence: f64,
    /// Display name returned by geocoder
    pub display_name: String,
}

// ==========================================================================
// MockGeocoder
// ==========================================================================

/// Mock geocoder for testing - returns deterministic fake coordinates
pub struct MockGeocoder;

impl MockGeocoder {
    pub fn new() -> Self {
        Self
    }

    /// Generate deterministic coordinates from the place-name hash.
    /// Coordinates land inside the contiguous United States, away from the
    /// coasts, so road routing against them stays plausible.
    fn hash_to_coordinates(location: &str) -> Coordinates {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        location.hash(&mut hasher);
        let hash = hasher.finish();

        const LAT_MIN: f64 = 33.0; // north of the Gulf coast
        const LAT_MAX: f64 = 45.0; // south of the Canadian border
        const LNG_MIN: f64 = -115.0; // east of the Sierra Nevada
        const LNG_MAX: f64 = -85.0; // west of the Appalachians

        let lat_normalized = ((hash >> 32) as f64) / (u32::MAX as f64);
        let lng_normalized = ((hash & 0xFFFF_FFFF) as f64) / (u32::MAX as f64);

        Coordinates {
            lat: LAT_MIN + lat_normalized * (LAT_MAX - LAT_MIN),
            lng: LNG_MIN + lng_normalized * (LNG_MAX - LNG_MIN),
        }
    }
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, location: &str) -> Result<Option<GeocodingResult>> {
        let coordinates = Self::hash_to_coordinates(location);

        Ok(Some(GeocodingResult {
            coordinates,
            confidence: 0.95,
            display_name: format!("{}, United States", location),
        }))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ==========================================================================
// RateLimiter
// ==========================================================================

/// Rate limiter that enforces minimum interval between calls
pub struct RateLimiter {
    last_call: Arc<Mutex<Option<Instant>>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_call: Arc::new(Mutex::new(None)),
            min_interval,
        }
    }

    /// Wait until it's safe to make another call
    pub async fn wait(&self) {
        let mut last = self.last_call.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                drop(last); // Release lock while sleeping
                tokio::time::sleep(wait_time).await;
                last = self.last_call.lock().await;
            }
        }

        *last = Some(Instant::now());
    }
}

// ==========================================================================
// CircuitBreaker
// ==========================================================================

/// Circuit breaker to prevent hammering a failing service
pub struct CircuitBreaker {
    failure_count: AtomicU32,
    threshold: u32,
    last_failure: Arc<Mutex<Option<Instant>>>,
    recovery_time: Duration,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, recovery_time: Duration) -> Self {
        Self {
            failure_count: AtomicU32::new(0),
            threshold,
            last_failure: Arc::new(Mutex::new(None)),
            recovery_time,
        }
    }

    /// Check if circuit is open (blocking calls)
    pub fn is_open(&self) -> bool {
        let count = self.failure_count.load(Ordering::Relaxed);
        if count >= self.threshold {
            // Check if recovery time has passed
            if let Ok(last) = self.last_failure.try_lock() {
                if let Some(last_time) = *last {
                    if last_time.elapsed() >= self.recovery_time {
                        return false; // Allow retry (half-open)
                    }
                }
            }
            return true;
        }
        false
    }

    /// Record a failure
    pub fn record_failure(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_failure.try_lock() {
            *last = Some(Instant::now());
        }
    }

    /// Record a success (resets failure count)
    pub fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
    }
}

// ==========================================================================
// RateLimitedNominatimGeocoder
// ==========================================================================

/// Default rate limit interval (1.5 seconds - Nominatim allows 1 req/s)
const DEFAULT_RATE_LIMIT_MS: u64 = 1500;

/// Default circuit breaker threshold (3 failures)
const DEFAULT_CIRCUIT_BREAKER_THRESHOLD: u32 = 3;

/// Default circuit breaker recovery time (5 minutes)
const DEFAULT_CIRCUIT_BREAKER_RECOVERY_SECS: u64 = 300;

/// Rate-limited Nominatim geocoder with circuit breaker protection
///
/// This geocoder wraps the NominatimClient with:
/// - Rate limiting: enforces minimum interval between requests
/// - Circuit breaker: stops requests after repeated failures
pub struct RateLimitedNominatimGeocoder {
    client: NominatimClient,
    rate_limiter: RateLimiter,
    /// Circuit breaker - pub(crate) for testing
    pub(crate) circuit_breaker: CircuitBreaker,
}

impl RateLimitedNominatimGeocoder {
    /// Create a new rate-limited Nominatim geocoder with default settings
    pub fn new() -> Self {
        Self::with_config(
            "https://nominatim.openstreetmap.org",
            Duration::from_millis(DEFAULT_RATE_LIMIT_MS),
            DEFAULT_CIRCUIT_BREAKER_THRESHOLD,
            Duration::from_secs(DEFAULT_CIRCUIT_BREAKER_RECOVERY_SECS),
        )
    }

    /// Create with custom configuration
    pub fn with_config(
        base_url: &str,
        rate_limit_interval: Duration,
        circuit_breaker_threshold: u32,
        circuit_breaker_recovery: Duration,
    ) -> Self {
        Self {
            client: NominatimClient::new(base_url),
            rate_limiter: RateLimiter::new(rate_limit_interval),
            circuit_breaker: CircuitBreaker::new(circuit_breaker_threshold, circuit_breaker_recovery),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let base_url = std::env::var("NOMINATIM_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

        let rate_limit_ms = std::env::var("NOMINATIM_RATE_LIMIT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_MS);

        let cb_threshold = std::env::var("NOMINATIM_CB_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CIRCUIT_BREAKER_THRESHOLD);

        let cb_recovery_secs = std::env::var("NOMINATIM_CB_RECOVERY_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CIRCUIT_BREAKER_RECOVERY_SECS);

        Self::with_config(
            &base_url,
            Duration::from_millis(rate_limit_ms),
            cb_threshold,
            Duration::from_secs(cb_recovery_secs),
        )
    }
}

impl Default for RateLimitedNominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for RateLimitedNominatimGeocoder {
    async fn geocode(&self, location: &str) -> Result<Option<GeocodingResult>> {
        // Check circuit breaker first
        if self.circuit_breaker.is_open() {
            tracing::warn!("Circuit breaker is open, rejecting geocoding request");
            return Err(anyhow::anyhow!("Geocoding service temporarily unavailable (circuit breaker open)"));
        }

        // Wait for rate limiter
        self.rate_limiter.wait().await;

        // Make the actual request
        match self.client.geocode(location).await {
            Ok(Some(place)) => {
                self.circuit_breaker.record_success();
                Ok(Some(GeocodingResult {
                    coordinates: place.coordinates,
                    confidence: 0.8, // Nominatim doesn't provide confidence, use default
                    display_name: place.display_name,
                }))
            }
            Ok(None) => {
                // No result found is not a failure
                self.circuit_breaker.record_success();
                Ok(None)
            }
            Err(e) => {
                self.circuit_breaker.record_failure();
                tracing::error!("Geocoding failed: {}", e);
                Err(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "nominatim"
    }
}

// ==========================================================================
// Factory function
// ==========================================================================

/// Create geocoder based on GEOCODER_BACKEND environment variable
///
/// # Environment Variables
///
/// - `GEOCODER_BACKEND`: "mock" or "nominatim" (default: "mock")
/// - `NOMINATIM_URL`: Nominatim API URL (default: public OSM)
/// - `NOMINATIM_RATE_LIMIT_MS`: Minimum interval between requests (default: 1500)
/// - `NOMINATIM_CB_THRESHOLD`: Circuit breaker failure threshold (default: 3)
/// - `NOMINATIM_CB_RECOVERY_SECS`: Circuit breaker recovery time (default: 300)
pub fn create_geocoder() -> Box<dyn Geocoder> {
    let backend = std::env::var("GEOCODER_BACKEND").unwrap_or_else(|_| "mock".to_string());

    match backend.as_str() {
        "mock" => {
            tracing::info!("Using MockGeocoder");
            Box::new(MockGeocoder::new())
        }
        "nominatim" => {
            tracing::info!("Using RateLimitedNominatimGeocoder");
            Box::new(RateLimitedNominatimGeocoder::from_env())
        }
        _ => {
            tracing::warn!("Unknown GEOCODER_BACKEND '{}', using mock", backend);
            Box::new(MockGeocoder::new())
        }
    }
}
