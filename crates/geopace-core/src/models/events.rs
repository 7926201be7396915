// ABOUTME: Events routed into the tracker and outputs emitted by it
// ABOUTME: Serializable so traces can be replayed and events streamed as JSON lines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use serde::{Deserialize, Serialize};

use super::requests::AlarmHandle;
use super::sample::{PositionSample, StationaryFix};
use super::state::Pace;
use crate::config::TrackerConfig;
use crate::errors::{ErrorCode, TrackingError};

/// Notification from the circular-region watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionTransition {
    /// Device entered the watched region
    Entered,
    /// Device left the watched region
    Exited,
}

/// External command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum TrackerCommand {
    /// Begin tracking
    Start,
    /// Stop tracking and cancel every registration
    Stop,
    /// Force the aggressive or lazy track
    SwitchMode {
        /// Target track
        pace: Pace,
    },
    /// Replace the configuration snapshot
    Configure {
        /// New configuration
        config: TrackerConfig,
    },
}

/// Everything that can happen to the tracker, serialized onto one queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// Sample from the continuous subscription
    Sample {
        /// Delivered fix
        sample: PositionSample,
    },
    /// Sample answering a stationary poll
    PolledSample {
        /// Delivered fix
        sample: PositionSample,
    },
    /// Region watcher notification
    Region {
        /// Entered or exited
        transition: RegionTransition,
    },
    /// An alarm fired
    AlarmFired {
        /// Registration that fired
        handle: AlarmHandle,
    },
    /// External command
    Command {
        /// Command payload
        command: TrackerCommand,
    },
}

impl TrackerEvent {
    /// Continuous-subscription sample event
    #[must_use]
    pub const fn sample(sample: PositionSample) -> Self {
        Self::Sample { sample }
    }

    /// Poll answer event
    #[must_use]
    pub const fn polled(sample: PositionSample) -> Self {
        Self::PolledSample { sample }
    }

    /// Region watcher event
    #[must_use]
    pub const fn region(transition: RegionTransition) -> Self {
        Self::Region { transition }
    }

    /// Alarm event
    #[must_use]
    pub const fn alarm(handle: AlarmHandle) -> Self {
        Self::AlarmFired { handle }
    }

    /// Command event
    #[must_use]
    pub const fn command(command: TrackerCommand) -> Self {
        Self::Command { command }
    }

    /// Short label for logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Sample { .. } => "sample",
            Self::PolledSample { .. } => "polled_sample",
            Self::Region { .. } => "region",
            Self::AlarmFired { .. } => "alarm_fired",
            Self::Command { .. } => "command",
        }
    }
}

/// Audible or visual debug feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cue", content = "text", rename_all = "snake_case")]
pub enum DebugCue {
    /// Sample received or discarded
    Beep,
    /// Stationary region exited
    BeepBeepBeep,
    /// Speed acquisition confirmed
    DoodlyDoo,
    /// Stationary poll fired
    Dialtone,
    /// Free-form status message
    Message(String),
}

/// What the tracker hands to the sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerOutput {
    /// Accepted moving fix
    Location {
        /// Forwarded sample
        sample: PositionSample,
    },
    /// Confirmed or refreshed stationary fix
    Stationary {
        /// Stationary fix
        fix: StationaryFix,
    },
    /// Non-fatal error notification
    Error {
        /// Stable error code
        code: ErrorCode,
        /// Error text
        message: String,
    },
}

impl From<&TrackingError> for TrackerOutput {
    fn from(error: &TrackingError) -> Self {
        Self::Error {
            code: error.code(),
            message: error.to_string(),
        }
    }
}
