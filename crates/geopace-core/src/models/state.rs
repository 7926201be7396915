// ABOUTME: Tracking state, pace and polling schedule models
// ABOUTME: Describes which motion mode is active and how the stationary poll is paced
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Motion mode of the tracker; exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingState {
    /// High-frequency tracking with a speed-scaled distance filter
    Moving,
    /// Collecting samples to trust the reported speed
    AcquiringSpeed,
    /// Collecting samples to confirm a stationary fix
    AcquiringStationary,
    /// Watching a stationary region; no continuous subscription
    Stationary,
}

impl TrackingState {
    /// Whether an acquisition session belongs to this state
    #[must_use]
    pub const fn is_acquiring(self) -> bool {
        matches!(self, Self::AcquiringSpeed | Self::AcquiringStationary)
    }

    /// Whether this state belongs to the aggressive (moving) track
    #[must_use]
    pub const fn is_moving_track(self) -> bool {
        matches!(self, Self::Moving | Self::AcquiringSpeed)
    }
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Moving => "MOVING",
            Self::AcquiringSpeed => "ACQUIRING_SPEED",
            Self::AcquiringStationary => "ACQUIRING_STATIONARY",
            Self::Stationary => "STATIONARY",
        };
        f.write_str(name)
    }
}

/// Which track an external mode switch selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    /// Battery-hungry moving track
    Aggressive,
    /// Stationary-region track
    Lazy,
}

/// State an acquisition session is confirming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionTarget {
    /// Confirming reported speed before entering `MOVING`
    Speed,
    /// Confirming a stationary fix before entering `STATIONARY`
    Stationary,
}

impl AcquisitionTarget {
    /// Tracking state in which a session for this target runs
    #[must_use]
    pub const fn acquiring_state(self) -> TrackingState {
        match self {
            Self::Speed => TrackingState::AcquiringSpeed,
            Self::Stationary => TrackingState::AcquiringStationary,
        }
    }
}

/// Stationary poll pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollingMode {
    /// Low-frequency polling
    Lazy,
    /// High-frequency polling near the region boundary
    Aggressive,
}

/// Current stationary poll registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingSchedule {
    /// Active pacing
    pub mode: PollingMode,
    /// Repeat interval of the poll alarm
    pub interval: Duration,
    /// When the poll alarm last fired, if ever
    pub last_fire_time: Option<DateTime<Utc>>,
}

impl PollingSchedule {
    /// Fresh schedule that has never fired
    #[must_use]
    pub const fn new(mode: PollingMode, interval: Duration) -> Self {
        Self {
            mode,
            interval,
            last_fire_time: None,
        }
    }
}
