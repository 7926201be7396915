// ABOUTME: Tracker configuration snapshot with defaults, validation and restart detection
// ABOUTME: Read-only to the scheduler; any restart-relevant change triggers stop plus start
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! Tracker configuration.
//!
//! The scheduler never adjusts itself incrementally to a new configuration:
//! when [`TrackerConfig::requires_restart`] reports a difference, a running
//! tracker is stopped and started again with the new snapshot.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{defaults, timers};
use crate::errors::ConfigError;

/// Configuration snapshot consumed by the scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Moving-state sample interval in milliseconds
    pub interval_ms: u64,
    /// Fastest accepted moving-state interval in milliseconds
    pub fastest_interval_ms: u64,
    /// Base distance filter in meters
    pub distance_filter_m: u32,
    /// Minimum stationary region radius in meters
    pub stationary_radius_m: f64,
    /// Minutes between periodic stationary refreshes
    pub stationary_update_interval_mins: u64,
    /// Desired accuracy in meters
    pub desired_accuracy_m: u32,
    /// Lazy stationary poll interval in seconds
    pub lazy_poll_interval_secs: u64,
    /// Aggressive stationary poll interval in seconds
    pub aggressive_poll_interval_secs: u64,
    /// Emit debug cues
    pub debug: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            interval_ms: defaults::INTERVAL_MS,
            fastest_interval_ms: defaults::FASTEST_INTERVAL_MS,
            distance_filter_m: defaults::DISTANCE_FILTER_M,
            stationary_radius_m: defaults::STATIONARY_RADIUS_M,
            stationary_update_interval_mins: defaults::STATIONARY_UPDATE_INTERVAL_MINS,
            desired_accuracy_m: defaults::DESIRED_ACCURACY_M,
            lazy_poll_interval_secs: timers::POLLING_INTERVAL_LAZY.as_secs(),
            aggressive_poll_interval_secs: timers::POLLING_INTERVAL_AGGRESSIVE.as_secs(),
            debug: false,
        }
    }
}

impl TrackerConfig {
    /// Moving-state sample interval
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Fastest accepted moving-state interval
    #[must_use]
    pub const fn fastest_interval(&self) -> Duration {
        Duration::from_millis(self.fastest_interval_ms)
    }

    /// Minimum wall-clock time between periodic stationary refreshes
    #[must_use]
    pub const fn stationary_update_interval(&self) -> Duration {
        Duration::from_secs(self.stationary_update_interval_mins.saturating_mul(60))
    }

    /// Lazy poll interval
    #[must_use]
    pub const fn lazy_poll_interval(&self) -> Duration {
        Duration::from_secs(self.lazy_poll_interval_secs)
    }

    /// Aggressive poll interval
    #[must_use]
    pub const fn aggressive_poll_interval(&self) -> Duration {
        Duration::from_secs(self.aggressive_poll_interval_secs)
    }

    /// Validate ranges
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValueOutOfRange` for the first invalid field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.stationary_radius_m.is_finite() || self.stationary_radius_m <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "stationary_radius_m must be a positive number",
            ));
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::ValueOutOfRange("interval_ms must be positive"));
        }
        if self.fastest_interval_ms > self.interval_ms {
            return Err(ConfigError::ValueOutOfRange(
                "fastest_interval_ms must not exceed interval_ms",
            ));
        }
        if self.lazy_poll_interval_secs == 0 || self.aggressive_poll_interval_secs == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "poll intervals must be positive",
            ));
        }
        Ok(())
    }

    /// Whether switching from `self` to `next` needs a full stop and restart
    #[must_use]
    pub fn requires_restart(&self, next: &Self) -> bool {
        self.interval_ms != next.interval_ms
            || self.fastest_interval_ms != next.fastest_interval_ms
            || self.distance_filter_m != next.distance_filter_m
            || (self.stationary_radius_m - next.stationary_radius_m).abs() > f64::EPSILON
            || self.stationary_update_interval_mins != next.stationary_update_interval_mins
            || self.desired_accuracy_m != next.desired_accuracy_m
            || self.lazy_poll_interval_secs != next.lazy_poll_interval_secs
            || self.aggressive_poll_interval_secs != next.aggressive_poll_interval_secs
            || self.debug != next.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(TrackerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_radius() {
        let config = TrackerConfig {
            stationary_radius_m: 0.0,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange(_))
        ));

        let config = TrackerConfig {
            stationary_radius_m: f64::NAN,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_fastest_above_interval() {
        let config = TrackerConfig {
            interval_ms: 1_000,
            fastest_interval_ms: 2_000,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_restart_detection() {
        let base = TrackerConfig::default();
        assert!(!base.requires_restart(&base.clone()));

        let radius = TrackerConfig {
            stationary_radius_m: 75.0,
            ..base.clone()
        };
        assert!(base.requires_restart(&radius));

        let debug = TrackerConfig {
            debug: true,
            ..base.clone()
        };
        assert!(base.requires_restart(&debug));

        let accuracy = TrackerConfig {
            desired_accuracy_m: 10,
            ..base.clone()
        };
        assert!(base.requires_restart(&accuracy));
    }

    #[test]
    fn test_huge_update_interval_saturates() {
        let config = TrackerConfig {
            stationary_update_interval_mins: u64::MAX / 30,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(
            config.stationary_update_interval(),
            Duration::from_secs(u64::MAX)
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{"distance_filter_m": 50, "debug": true}"#).unwrap();
        assert_eq!(config.distance_filter_m, 50);
        assert!(config.debug);
        assert_eq!(config.interval_ms, defaults::INTERVAL_MS);
    }
}
