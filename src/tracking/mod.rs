// ABOUTME: Tracking core: motion-state machine, acquisition, distance filter and stationary monitor
// ABOUTME: Pure decision logic that emits directives instead of calling collaborators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

/// Attempt counting that debounces state transitions
pub mod acquisition;
/// Collaborator requests produced by the state machine
pub mod directives;
/// Speed-scaled distance filter
pub mod distance_filter;
/// The motion-state machine
pub mod state_machine;
/// Stationary region watch and polling fallback
pub mod stationary_monitor;

pub use acquisition::{AcquisitionController, AcquisitionSession, AttemptOutcome};
pub use directives::{Directive, Directives};
pub use distance_filter::DistanceFilterCalculator;
pub use state_machine::{MotionStateMachine, TrackerSnapshot};
pub use stationary_monitor::{PollOutcome, StationaryRegionMonitor};
