//! Trip planning handler
//!
//! Orchestrates one planning request end to end: geocode the three
//! locations, route the two legs, run the HOS simulator, insert fuel stops,
//! place rest stops on the polyline, render the daily logs, and assemble
//! the response. The core never does I/O; everything network-bound happens
//! here, before the simulator runs.

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::hos::{insert_fuel_stops, FuelPolicy, HosLimits, PlanError, TripInput, TripSimulator, TripSummary};
use crate::services::eld_log::generate_daily_logs;
use crate::services::geocoding::Geocoder;
use crate::services::rest_stops::{cumulative_rest_distances, locate_rest_stops};
use crate::services::routing::RoutingService;
use crate::types::{
    Coordinates, ErrorResponse, PlanTripRequest, PlanTripResponse, Request, RouteInfo,
    SuccessResponse, TripCoordinates,
};

/// Shared collaborators for trip planning
pub struct PlanContext {
    pub geocoder: Arc<dyn Geocoder>,
    pub routing: Arc<dyn RoutingService>,
    pub average_speed_mph: f64,
    pub pickup_duration_hours: f64,
    pub dropoff_duration_hours: f64,
}

/// Failure of a single planning request, mapped to a response error code
#[derive(Debug, Error)]
pub enum PlanRequestError {
    #[error("{0}")]
    Invalid(String),
    #[error("could not geocode location: {0}")]
    Geocoding(String),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlanRequestError {
    pub fn code(&self) -> &'static str {
        match self {
            PlanRequestError::Invalid(_) => "INVALID_REQUEST",
            PlanRequestError::Geocoding(_) => "GEOCODING_FAILED",
            PlanRequestError::Plan(PlanError::InvalidInput(_)) => "INVALID_REQUEST",
            PlanRequestError::Plan(PlanError::CycleExhausted { .. }) => "CYCLE_EXHAUSTED",
            PlanRequestError::Plan(PlanError::NonTerminating(_)) => "PLANNING_FAILED",
            PlanRequestError::Other(_) => "INTERNAL_ERROR",
        }
    }
}

/// Plan a trip from a validated request.
pub async fn plan_trip(
    ctx: &PlanContext,
    request: &PlanTripRequest,
) -> Result<PlanTripResponse, PlanRequestError> {
    validate_request(request)?;

    let current = geocode(ctx, &request.current_location).await?;
    let pickup = geocode(ctx, &request.pickup_location).await?;
    let dropoff = geocode(ctx, &request.dropoff_location).await?;

    let leg1 = ctx.routing.route(current, pickup).await?;
    let leg2 = ctx.routing.route(pickup, dropoff).await?;
    debug!(
        "Routed legs: {:.1} mi to pickup, {:.1} mi to dropoff",
        leg1.distance_miles, leg2.distance_miles
    );

    let simulator = TripSimulator::new(HosLimits::default());
    let schedule = simulator.simulate(&TripInput {
        distance_to_pickup_miles: leg1.distance_miles,
        distance_pickup_to_dropoff_miles: leg2.distance_miles,
        average_speed_mph: ctx.average_speed_mph,
        pickup_duration_hours: ctx.pickup_duration_hours,
        dropoff_duration_hours: ctx.dropoff_duration_hours,
        cycle_hours_used: request.current_cycle_used,
    })?;
    let schedule = insert_fuel_stops(&schedule, &FuelPolicy::default());

    // Leg 2 starts where leg 1 ends; drop the duplicated joint waypoint
    let mut waypoints = leg1.waypoints;
    waypoints.extend(leg2.waypoints.into_iter().skip(1));

    let rest_stops = locate_rest_stops(&waypoints, &cumulative_rest_distances(&schedule));
    let eld_logs = generate_daily_logs(&schedule, &request.driver_name);
    let summary =
        TripSummary::from_segments(&schedule, request.current_cycle_used, simulator.limits());

    Ok(PlanTripResponse {
        route: RouteInfo {
            total_distance: leg1.distance_miles + leg2.distance_miles,
            distance_to_pickup: leg1.distance_miles,
            distance_pickup_to_dropoff: leg2.distance_miles,
            coordinates: TripCoordinates {
                current,
                pickup,
                dropoff,
            },
            waypoints,
            rest_stops,
        },
        schedule,
        summary,
        eld_logs,
    })
}

fn validate_request(request: &PlanTripRequest) -> Result<(), PlanRequestError> {
    for (field, value) in [
        ("currentLocation", &request.current_location),
        ("pickupLocation", &request.pickup_location),
        ("dropoffLocation", &request.dropoff_location),
    ] {
        if value.trim().is_empty() {
            return Err(PlanRequestError::Invalid(format!("{field} must not be empty")));
        }
    }

    let max_cycle = HosLimits::default().max_cycle_hours;
    if request.current_cycle_used < 0.0 || request.current_cycle_used > max_cycle {
        return Err(PlanRequestError::Invalid(format!(
            "currentCycleUsed must be within [0, {}], got {}",
            max_cycle, request.current_cycle_used
        )));
    }

    Ok(())
}

async fn geocode(ctx: &PlanContext, location: &str) -> Result<Coordinates, PlanRequestError> {
    match ctx.geocoder.geocode(location).await {
        Ok(Some(result)) => Ok(result.coordinates),
        Ok(None) => Err(PlanRequestError::Geocoding(location.to_string())),
        Err(e) => {
            warn!("Geocoder error for '{}': {}", location, e);
            Err(PlanRequestError::Geocoding(location.to_string()))
        }
    }
}

/// Handle trip.plan requests
pub async fn handle_plan(
    client: Client,
    mut subscriber: Subscriber,
    ctx: Arc<PlanContext>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received trip.plan message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("trip.plan message without reply subject");
                continue;
            }
        };

        let request: Request<PlanTripRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse trip.plan request: {}", e);
                let response = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
                continue;
            }
        };

        match plan_trip(&ctx, &request.payload).await {
            Ok(plan) => {
                info!(
                    "Planned trip: {:.0} miles over {} days",
                    plan.summary.total_distance_miles, plan.summary.total_trip_days
                );
                let response = SuccessResponse::new(request.id, plan);
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
            Err(e) => {
                error!("Trip planning failed: {}", e);
                let response = ErrorResponse::new(request.id, e.code(), e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&response)?.into()).await;
            }
        }
    }

    Ok(())
}
