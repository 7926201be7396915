// ABOUTME: Tracker constants for acquisition caps, timers and the distance filter
// ABOUTME: Provides named constants to eliminate magic numbers in the scheduler
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

/// Acquisition protocol caps
pub mod acquisition {
    /// Samples required before committing a stationary fix
    pub const MAX_STATIONARY_ACQUISITION_ATTEMPTS: u32 = 1;

    /// Samples required before trusting the reported speed
    pub const MAX_SPEED_ACQUISITION_ATTEMPTS: u32 = 3;
}

/// Distance filter scaling
pub mod distance_filter {
    /// Speeds are rounded to the nearest multiple of this step (m/s)
    pub const SPEED_ROUNDING_STEP: f64 = 5.0;

    /// At or above this speed (m/s) the base filter is used unscaled
    pub const SCALING_SPEED_CEILING: f64 = 100.0;

    /// Upper bound of any computed filter (meters)
    pub const MAX_DISTANCE_FILTER_M: u32 = 1000;
}

/// Motion thresholds
pub mod motion {
    /// Minimum speed (m/s) for a sample to re-arm the stationary timeout
    pub const MIN_RESET_SPEED_MPS: f64 = 1.0;

    /// Mean Earth radius used for great-circle distances (meters)
    pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
}

/// Alarm timings
pub mod timers {
    use std::time::Duration;

    /// Continuous moving time without a qualifying sample before going lazy
    pub const STATIONARY_TIMEOUT: Duration = Duration::from_secs(10 * 60);

    /// Delay before the first stationary poll fires
    pub const POLLING_START_DELAY: Duration = Duration::from_secs(60);

    /// Default lazy stationary poll interval
    pub const POLLING_INTERVAL_LAZY: Duration = Duration::from_secs(5 * 60);

    /// Default aggressive stationary poll interval
    pub const POLLING_INTERVAL_AGGRESSIVE: Duration = Duration::from_secs(5 * 60);
}

/// Configuration defaults
pub mod defaults {
    /// Moving-state sample interval (milliseconds)
    pub const INTERVAL_MS: u64 = 600_000;

    /// Fastest accepted sample interval (milliseconds)
    pub const FASTEST_INTERVAL_MS: u64 = 120_000;

    /// Base distance filter (meters)
    pub const DISTANCE_FILTER_M: u32 = 500;

    /// Minimum stationary region radius (meters)
    pub const STATIONARY_RADIUS_M: f64 = 50.0;

    /// Minutes between periodic stationary refreshes
    pub const STATIONARY_UPDATE_INTERVAL_MINS: u64 = 60;

    /// Desired accuracy (meters)
    pub const DESIRED_ACCURACY_M: u32 = 100;
}

/// Environment variable names
pub mod env_config {
    /// Moving-state interval in milliseconds
    pub const INTERVAL_MS: &str = "GEOPACE_INTERVAL_MS";
    /// Fastest interval in milliseconds
    pub const FASTEST_INTERVAL_MS: &str = "GEOPACE_FASTEST_INTERVAL_MS";
    /// Base distance filter in meters
    pub const DISTANCE_FILTER_M: &str = "GEOPACE_DISTANCE_FILTER_M";
    /// Stationary radius in meters
    pub const STATIONARY_RADIUS_M: &str = "GEOPACE_STATIONARY_RADIUS_M";
    /// Stationary update interval in minutes
    pub const STATIONARY_UPDATE_INTERVAL_MINS: &str = "GEOPACE_STATIONARY_UPDATE_INTERVAL_MINS";
    /// Desired accuracy in meters
    pub const DESIRED_ACCURACY_M: &str = "GEOPACE_DESIRED_ACCURACY_M";
    /// Lazy poll interval in seconds
    pub const LAZY_POLL_INTERVAL_SECS: &str = "GEOPACE_LAZY_POLL_INTERVAL_SECS";
    /// Aggressive poll interval in seconds
    pub const AGGRESSIVE_POLL_INTERVAL_SECS: &str = "GEOPACE_AGGRESSIVE_POLL_INTERVAL_SECS";
    /// Debug feedback toggle
    pub const DEBUG: &str = "GEOPACE_DEBUG";
}

/// Service identity for structured logs
pub mod service_names {
    /// Service name reported at startup
    pub const GEOPACE: &str = "geopace";
}

/// Runtime sizing
pub mod runtime {
    /// Capacity of the tracker event queue
    pub const EVENT_CHANNEL_SIZE: usize = 256;

    /// Capacity of the output broadcast channel
    pub const OUTPUT_CHANNEL_SIZE: usize = 128;
}
