//! NATS message types

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::schedule::{Coordinates, RestStop, ScheduleSegment};
use crate::hos::TripSummary;

/// Generic request wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request<T> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

impl<T> Request<T> {
    pub fn new(payload: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Generic success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse<T> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(request_id: Uuid, payload: T) -> Self {
        Self {
            id: request_id,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(request_id: Uuid, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: request_id,
            timestamp: Utc::now(),
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// Request to plan a trip
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTripRequest {
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    /// Hours already used in the 70-hour/8-day cycle
    #[serde(default)]
    pub current_cycle_used: f64,
    #[serde(default = "default_driver_name")]
    pub driver_name: String,
}

fn default_driver_name() -> String {
    "Driver".to_string()
}

/// Geocoded endpoints of the trip
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripCoordinates {
    pub current: Coordinates,
    pub pickup: Coordinates,
    pub dropoff: Coordinates,
}

/// Route block of the planning response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub total_distance: f64,
    pub distance_to_pickup: f64,
    pub distance_pickup_to_dropoff: f64,
    pub coordinates: TripCoordinates,
    /// Ordered route polyline, leg 1 followed by leg 2
    pub waypoints: Vec<Coordinates>,
    pub rest_stops: Vec<RestStop>,
}

/// Full planning response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTripResponse {
    pub route: RouteInfo,
    pub schedule: Vec<ScheduleSegment>,
    pub summary: TripSummary,
    /// One rendered log sheet per trip day, as data URIs
    pub eld_logs: Vec<String>,
}
