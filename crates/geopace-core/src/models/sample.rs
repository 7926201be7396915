// ABOUTME: Position sample and stationary fix models with validation and geodesic distance
// ABOUTME: Samples are immutable values produced by the external position source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::motion::EARTH_RADIUS_M;
use crate::errors::{TrackingError, TrackingResult};

/// A timestamped position fix as delivered by the position source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Horizontal accuracy radius in meters (lower is better)
    pub accuracy: f64,
    /// Ground speed in meters per second
    pub speed: f64,
    /// When the fix was taken
    pub timestamp: DateTime<Utc>,
}

impl PositionSample {
    /// Create a new sample
    #[must_use]
    pub const fn new(
        latitude: f64,
        longitude: f64,
        accuracy: f64,
        speed: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            speed,
            timestamp,
        }
    }

    /// Check that every field is physically meaningful
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::InvalidSample` naming the first malformed field
    pub fn validate(&self) -> TrackingResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(TrackingError::invalid_sample(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(TrackingError::invalid_sample(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        if !self.accuracy.is_finite() || self.accuracy < 0.0 {
            return Err(TrackingError::invalid_sample(format!(
                "accuracy {} must be a non-negative number",
                self.accuracy
            )));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(TrackingError::invalid_sample(format!(
                "speed {} must be a non-negative number",
                self.speed
            )));
        }
        Ok(())
    }

    /// Great-circle distance to another sample in meters (haversine)
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Whether this sample is strictly more accurate than `other`
    #[must_use]
    pub fn is_more_accurate_than(&self, other: &Self) -> bool {
        self.accuracy < other.accuracy
    }
}

/// A confirmed stationary position and the radius of the region watched around it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationaryFix {
    /// Confirmed stationary position
    pub location: PositionSample,
    /// Region radius in meters, never below the configured minimum
    pub radius: f64,
}

impl StationaryFix {
    /// Build a fix whose radius is the larger of `min_radius` and the fix accuracy
    #[must_use]
    pub fn new(location: PositionSample, min_radius: f64) -> Self {
        Self {
            location,
            radius: min_radius.max(location.accuracy),
        }
    }

    /// Same region, refreshed with a newer location
    #[must_use]
    pub const fn refreshed(&self, location: PositionSample) -> Self {
        Self {
            location,
            radius: self.radius,
        }
    }
}
