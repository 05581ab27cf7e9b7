//! NATS message handlers

pub mod ping;
pub mod plan;

use std::sync::Arc;
use anyhow::Result;
use async_nats::Client;
use tracing::{error, info};
use tokio::select;

use crate::config::Config;
use crate::handlers::plan::PlanContext;
use crate::services::geocoding::{create_geocoder, Geocoder};
use crate::services::routing::{create_routing_service, RoutingConfig, RoutingService};

/// Start all message handlers
pub async fn start_handlers(client: Client, config: &Config) -> Result<()> {
    info!("Starting message handlers...");

    // Create shared geocoder
    let geocoder: Arc<dyn Geocoder> = Arc::from(create_geocoder());
    info!("Geocoder initialized: {}", geocoder.name());

    // Create routing chain (OSRM → ORS → geodesic)
    let routing: Arc<dyn RoutingService> = Arc::from(create_routing_service(&RoutingConfig {
        osrm_url: config.osrm_url.clone(),
        ors_api_key: config.ors_api_key.clone(),
        timeout_seconds: config.routing_timeout_seconds,
    }));
    info!("Routing service initialized: {}", routing.name());

    let ctx = Arc::new(PlanContext {
        geocoder,
        routing,
        average_speed_mph: config.average_speed_mph,
        pickup_duration_hours: crate::defaults::DEFAULT_PICKUP_DURATION_HOURS,
        dropoff_duration_hours: crate::defaults::DEFAULT_DROPOFF_DURATION_HOURS,
    });

    // Subscribe to all subjects
    let ping_sub = client.subscribe("truckline.ping").await?;
    let plan_sub = client.subscribe("truckline.trip.plan").await?;

    info!("Subscribed to NATS subjects");

    // Spawn handlers
    let client_ping = client.clone();
    let ping_handle = tokio::spawn(async move {
        ping::handle_ping(client_ping, ping_sub).await
    });

    let client_plan = client.clone();
    let plan_handle = tokio::spawn(async move {
        plan::handle_plan(client_plan, plan_sub, ctx).await
    });

    info!("All handlers started");

    // Handlers run until the NATS connection drops; whichever finishes
    // first takes the worker down.
    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = plan_handle => {
            error!("Trip plan handler finished: {:?}", result);
        }
    }

    Ok(())
}
