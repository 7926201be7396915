// ABOUTME: Deterministic simulation harness: virtual clock, virtual alarms and recording collaborators
// ABOUTME: Drives a real Tracker without wall-clock time for trace replay and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! # Simulation
//!
//! Runs the production [`Tracker`](crate::router::Tracker) against
//! in-memory collaborators. Time only moves when [`Simulation::advance`] is
//! called, and alarms fire in due order at their exact virtual instant, so a
//! trace replays identically every time.

/// Virtual alarm scheduler
pub mod alarms;
/// Virtual clock
pub mod clock;
/// Simulation driver
pub mod harness;
/// Collaborators that record every call
pub mod recording;
/// JSON scenario files
pub mod scenario;

pub use alarms::{AlarmRecord, VirtualAlarmScheduler};
pub use clock::VirtualClock;
pub use harness::Simulation;
pub use recording::{PlatformRecorder, Recorded};
pub use scenario::{Scenario, ScenarioError, ScenarioReport, ScenarioStep};
