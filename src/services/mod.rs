//! Business logic services

pub mod eld_log;
pub mod geo;
pub mod geocoding;
pub mod nominatim;
pub mod rest_stops;
pub mod routing;
