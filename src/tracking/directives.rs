// ABOUTME: Fire-and-forget requests the state machine issues against its collaborators
// ABOUTME: Keeps the state machine free of side effects; the router executes them in order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use geopace_core::models::{DebugCue, PositionSample, SampleRequest, StationaryFix};
use std::time::Duration;

/// A single collaborator request
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// (Re)subscribe to continuous samples
    RequestSamples(SampleRequest),
    /// Drop the continuous subscription
    CancelSamples,
    /// Ask for one high-accuracy sample answering a stationary poll
    RequestSingleSample,
    /// Register the circular region watch, replacing any existing one
    WatchRegion {
        /// Region center
        center: PositionSample,
        /// Region radius in meters
        radius_m: f64,
    },
    /// Remove the region watch
    CancelRegionWatch,
    /// (Re)arm the one-shot stationary timeout
    ArmStationaryTimeout {
        /// Delay until the timeout fires
        delay: Duration,
    },
    /// Cancel the stationary timeout
    CancelStationaryTimeout,
    /// (Re)arm the repeating stationary poll
    ArmPolling {
        /// Delay until the first poll
        first_delay: Duration,
        /// Repeat interval
        interval: Duration,
    },
    /// Cancel the stationary poll
    CancelPolling,
    /// Forward an accepted moving fix to the sink
    EmitLocation(PositionSample),
    /// Forward a stationary fix to the sink
    EmitStationary(StationaryFix),
    /// Debug feedback
    Cue(DebugCue),
}

impl Directive {
    /// Short label for logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::RequestSamples(_) => "request_samples",
            Self::CancelSamples => "cancel_samples",
            Self::RequestSingleSample => "request_single_sample",
            Self::WatchRegion { .. } => "watch_region",
            Self::CancelRegionWatch => "cancel_region_watch",
            Self::ArmStationaryTimeout { .. } => "arm_stationary_timeout",
            Self::CancelStationaryTimeout => "cancel_stationary_timeout",
            Self::ArmPolling { .. } => "arm_polling",
            Self::CancelPolling => "cancel_polling",
            Self::EmitLocation(_) => "emit_location",
            Self::EmitStationary(_) => "emit_stationary",
            Self::Cue(_) => "cue",
        }
    }
}

/// Ordered batch of directives produced by one event
pub type Directives = Vec<Directive>;
