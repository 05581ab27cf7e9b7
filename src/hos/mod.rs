//! Hours-of-Service planning core
//!
//! Pure, synchronous, deterministic: no I/O and no shared state. The NATS
//! handlers feed it distances obtained from the routing service and consume
//! its segment list.

pub mod fuel;
pub mod limits;
pub mod simulator;
pub mod summary;

pub use fuel::insert_fuel_stops;
pub use limits::{FuelPolicy, HosLimits};
pub use simulator::{PlanError, SimState, TripInput, TripSimulator};
pub use summary::TripSummary;
