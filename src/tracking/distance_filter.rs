// ABOUTME: Speed-to-distance-filter mapping used to throttle moving-state sampling
// ABOUTME: Pure function: rounded speed squared plus the base filter, capped at 1000 m
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use geopace_core::constants::distance_filter::{
    MAX_DISTANCE_FILTER_M, SCALING_SPEED_CEILING, SPEED_ROUNDING_STEP,
};

/// Maps the last confirmed speed to the next sampling distance threshold
///
/// Faster motion widens the filter quadratically so that highway speeds do not
/// flood the sink, while walking speeds keep close to the configured base.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceFilterCalculator;

impl DistanceFilterCalculator {
    /// Compute the filter in meters for `speed_mps` on top of `base_filter_m`
    ///
    /// Below 100 m/s the speed is rounded to the nearest multiple of 5, squared
    /// and added to the base. At or above 100 m/s the base is returned unscaled.
    /// Either way the result never exceeds 1000 m.
    #[must_use]
    pub fn calculate(speed_mps: f64, base_filter_m: u32) -> u32 {
        let base = f64::from(base_filter_m);
        let filter = if speed_mps < SCALING_SPEED_CEILING {
            let rounded = (speed_mps / SPEED_ROUNDING_STEP).round() * SPEED_ROUNDING_STEP;
            rounded.powi(2) + base
        } else {
            base
        };

        if filter < f64::from(MAX_DISTANCE_FILTER_M) {
            filter as u32
        } else {
            MAX_DISTANCE_FILTER_M
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_speeds() {
        assert_eq!(DistanceFilterCalculator::calculate(0.0, 50), 50);
        assert_eq!(DistanceFilterCalculator::calculate(5.0, 50), 75);
        assert_eq!(DistanceFilterCalculator::calculate(95.0, 50), 1000);
        assert_eq!(DistanceFilterCalculator::calculate(100.0, 50), 50);
        assert_eq!(DistanceFilterCalculator::calculate(150.0, 50), 50);
    }

    #[test]
    fn test_rounds_to_nearest_step() {
        // 22 m/s rounds to 20 m/s
        assert_eq!(DistanceFilterCalculator::calculate(22.0, 50), 450);
        assert_eq!(DistanceFilterCalculator::calculate(2.4, 50), 50);
        assert_eq!(DistanceFilterCalculator::calculate(2.5, 50), 75);
        assert_eq!(DistanceFilterCalculator::calculate(7.6, 50), 150);
    }

    #[test]
    fn test_cap_applies_to_large_base() {
        assert_eq!(DistanceFilterCalculator::calculate(10.0, 990), 1000);
        assert_eq!(DistanceFilterCalculator::calculate(120.0, 1500), 1000);
    }
}
