// ABOUTME: Main library entry point for the geopace adaptive location tracker
// ABOUTME: Switches between moving and stationary tracking to trade sampling rate for battery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

#![deny(unsafe_code)]

//! # Geopace
//!
//! An adaptive location-tracking scheduler. While the device moves it
//! subscribes to position samples throttled by a speed-scaled distance
//! filter; once it stops, it drops the subscription, watches a circular
//! region around the stationary fix and polls it on a slow timer until the
//! device leaves.
//!
//! ## Architecture
//!
//! - **tracking**: the pure motion-state machine and its helpers
//! - **router**: `Tracker`, which feeds events to the state machine and
//!   executes the resulting directives against the platform
//! - **platform**: collaborator traits (position source, region watcher,
//!   alarms, sink, debug feedback, clock)
//! - **runtime**: tokio actor, timers and broadcast output
//! - **simulation**: virtual time harness for replaying traces
//! - **config** / **logging**: environment configuration and tracing setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use geopace::simulation::Simulation;
//! use geopace::TrackerConfig;
//! use geopace_core::models::TrackerCommand;
//!
//! # fn main() -> Result<(), geopace::TrackingError> {
//! let mut simulation = Simulation::new(TrackerConfig::default())?;
//! simulation.command(TrackerCommand::Start)?;
//! println!("{:?}", simulation.snapshot().state);
//! # Ok(())
//! # }
//! ```

/// Environment configuration
pub mod config;

/// Tracing subscriber setup
pub mod logging;

/// Collaborator traits
pub mod platform;

/// Event router executing state machine directives
pub mod router;

/// Tokio runtime adapters
pub mod runtime;

/// Deterministic virtual-time harness
pub mod simulation;

/// Motion-state machine and tracking helpers
pub mod tracking;

pub use geopace_core::{
    ConfigError, ErrorCode, TrackerConfig, TrackingError, TrackingResult,
};
pub use router::Tracker;
pub use tracking::{MotionStateMachine, TrackerSnapshot};
