//! Truckline Worker - Backend service for HOS trip planning
//!
//! This worker connects to NATS and handles trip planning requests from the
//! frontend. The `plan` subcommand runs a single trip through the same
//! pipeline without NATS, printing the JSON response.

mod cli;
mod config;
mod defaults;
mod handlers;
mod hos;
mod services;
mod types;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use handlers::plan::{plan_trip, PlanContext};
use services::geocoding::create_geocoder;
use services::routing::{create_routing_service, RoutingConfig};
use types::PlanTripRequest;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs directory - use LOGS_DIR env var or default to ./logs
    let logs_dir = std::env::var("LOGS_DIR")
        .unwrap_or_else(|_| "./logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        &logs_dir,
        "worker.log",
    );
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,truckline_worker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())  // stdout
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))  // file
        .init();

    let args = cli::Cli::parse();

    // Load configuration
    let config = config::Config::from_env()?;
    info!("Configuration loaded");

    if let Some(cli::Command::Plan { from, pickup, dropoff, cycle_used, driver }) = args.command {
        return plan_once(&config, from, pickup, dropoff, cycle_used, driver).await;
    }

    info!("Starting Truckline Worker...");

    // Connect to NATS (supports optional NATS_USER/NATS_PASSWORD auth).
    let nats_client = match (std::env::var("NATS_USER"), std::env::var("NATS_PASSWORD")) {
        (Ok(user), Ok(password)) if !user.is_empty() => {
            async_nats::ConnectOptions::new()
                .user_and_password(user, password)
                .connect(&config.nats_url)
                .await?
        }
        _ => async_nats::connect(&config.nats_url).await?,
    };
    info!("Connected to NATS at {}", config.nats_url);

    // Start message handlers
    let handler_result = handlers::start_handlers(nats_client, &config).await;

    if let Err(e) = handler_result {
        error!("Handler error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// One-shot planning mode: run the full pipeline and print the response.
async fn plan_once(
    config: &config::Config,
    from: String,
    pickup: String,
    dropoff: String,
    cycle_used: f64,
    driver: String,
) -> Result<()> {
    let ctx = PlanContext {
        geocoder: Arc::from(create_geocoder()),
        routing: Arc::from(create_routing_service(&RoutingConfig {
            osrm_url: config.osrm_url.clone(),
            ors_api_key: config.ors_api_key.clone(),
            timeout_seconds: config.routing_timeout_seconds,
        })),
        average_speed_mph: config.average_speed_mph,
        pickup_duration_hours: defaults::DEFAULT_PICKUP_DURATION_HOURS,
        dropoff_duration_hours: defaults::DEFAULT_DROPOFF_DURATION_HOURS,
    };

    let request = PlanTripRequest {
        current_location: from,
        pickup_location: pickup,
        dropoff_location: dropoff,
        current_cycle_used: cycle_used,
        driver_name: driver,
    };

    match plan_trip(&ctx, &request).await {
        Ok(plan) => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Err(e) => {
            error!("Planning failed ({}): {}", e.code(), e);
            Err(e.into())
        }
    }
}
