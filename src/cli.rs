//! CLI argument parsing for the truckline-worker binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "truckline-worker", about = "Truckline HOS trip planning worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Plan a single trip and print the JSON response
    Plan {
        /// Current truck location, e.g. "Chicago, IL"
        #[arg(long)]
        from: String,
        /// Pickup location
        #[arg(long)]
        pickup: String,
        /// Dropoff location
        #[arg(long)]
        dropoff: String,
        /// Cycle hours already used within the 70-hour/8-day window
        #[arg(long, default_value_t = 0.0)]
        cycle_used: f64,
        /// Driver name printed on the log sheets
        #[arg(long, default_value = "Driver")]
        driver: String,
    },
}
