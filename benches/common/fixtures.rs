// ABOUTME: Benchmark fixtures generating deterministic position traces
// ABOUTME: Produces drive traces at a steady speed for reproducible measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! Benchmark test fixtures for generating position traces.

use chrono::{DateTime, Duration, Utc};
use geopace_core::models::PositionSample;

/// Meters per degree of latitude
const METERS_PER_DEGREE: f64 = 111_195.0;

/// Predefined trace lengths for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum TraceLength {
    /// Short commute (100 samples)
    Short,
    /// Long drive (1 000 samples)
    Long,
}

impl TraceLength {
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Short => 100,
            Self::Long => 1_000,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Short => "100_samples",
            Self::Long => "1000_samples",
        }
    }
}

/// Samples heading north at `speed_mps`, one per second
#[must_use]
pub fn drive_trace(length: TraceLength, speed_mps: f64) -> Vec<PositionSample> {
    let start = DateTime::<Utc>::default();
    (0..length.count())
        .map(|i| {
            let secs = i as f64;
            PositionSample::new(
                45.0 + secs * speed_mps / METERS_PER_DEGREE,
                -122.0,
                8.0,
                speed_mps,
                start + Duration::seconds(i as i64),
            )
        })
        .collect()
}
