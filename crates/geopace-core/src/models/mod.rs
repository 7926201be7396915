// ABOUTME: Domain models for the tracker: samples, states, requests and events
// ABOUTME: Re-exports every model so callers can `use geopace_core::models::*`
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

/// Tracker events, commands, debug cues and sink outputs
pub mod events;
/// Sample subscriptions and alarm handles
pub mod requests;
/// Position samples and stationary fixes
pub mod sample;
/// Tracking state, pace and polling schedule
pub mod state;

pub use events::{DebugCue, RegionTransition, TrackerCommand, TrackerEvent, TrackerOutput};
pub use requests::{AccuracyPriority, AlarmHandle, AlarmKind, SampleRequest};
pub use sample::{PositionSample, StationaryFix};
pub use state::{AcquisitionTarget, Pace, PollingMode, PollingSchedule, TrackingState};
