// ABOUTME: Shared test utilities and fixture builders for integration tests
// ABOUTME: Provides quiet logging, sample builders and pre-driven simulations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `geopace`

use std::sync::Once;

use chrono::{DateTime, TimeDelta, Utc};
use geopace::simulation::Simulation;
use geopace::TrackerConfig;
use geopace_core::models::{
    PositionSample, RegionTransition, TrackerCommand, TrackerEvent, TrackingState,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fixed origin used by fixtures
pub const HOME: (f64, f64) = (45.5231, -122.6765);

/// Meters per degree of latitude
pub const METERS_PER_DEGREE: f64 = 111_195.0;

/// Fixed reference instant
pub fn t0() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Sample `north_m` meters north of [`HOME`]
pub fn sample_at(north_m: f64, accuracy: f64, speed: f64) -> PositionSample {
    PositionSample::new(
        HOME.0 + north_m / METERS_PER_DEGREE,
        HOME.1,
        accuracy,
        speed,
        t0(),
    )
}

/// Sample at [`HOME`]
pub fn sample(accuracy: f64, speed: f64) -> PositionSample {
    sample_at(0.0, accuracy, speed)
}

/// Same sample, stamped `secs` after [`t0`]
pub fn at_secs(sample: PositionSample, secs: i64) -> PositionSample {
    PositionSample {
        timestamp: t0() + TimeDelta::seconds(secs),
        ..sample
    }
}

/// Defaults with debug cues on
pub fn debug_config() -> TrackerConfig {
    TrackerConfig {
        debug: true,
        ..TrackerConfig::default()
    }
}

/// Started simulation
pub fn started(config: TrackerConfig) -> Simulation {
    init_test_logging();
    let mut simulation = Simulation::new(config).unwrap();
    simulation.command(TrackerCommand::Start).unwrap();
    simulation
}

/// Simulation that has confirmed a stationary fix at [`HOME`] (accuracy 20 m)
pub fn stationary(config: TrackerConfig) -> Simulation {
    let mut simulation = started(config);
    simulation
        .dispatch(TrackerEvent::sample(sample(20.0, 0.0)))
        .unwrap();
    assert_eq!(simulation.snapshot().state, Some(TrackingState::Stationary));
    simulation
}

/// Simulation in `MOVING` after three speed samples at 10 m/s
pub fn moving(config: TrackerConfig) -> Simulation {
    let mut simulation = stationary(config);
    simulation
        .dispatch(TrackerEvent::region(RegionTransition::Exited))
        .unwrap();
    for step in 0..3 {
        simulation
            .dispatch(TrackerEvent::sample(sample_at(
                f64::from(step) * 100.0 + 500.0,
                10.0,
                10.0,
            )))
            .unwrap();
    }
    assert_eq!(simulation.snapshot().state, Some(TrackingState::Moving));
    simulation
}
