pub const DEFAULT_AVERAGE_SPEED_MPH: f64 = 55.0;

pub const DEFAULT_PICKUP_DURATION_HOURS: f64 = 1.0;

pub const DEFAULT_DROPOFF_DURATION_HOURS: f64 = 1.0;
