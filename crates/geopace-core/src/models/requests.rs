// ABOUTME: Request models sent to collaborators: sample subscriptions and alarm handles
// ABOUTME: Encodes rate, distance threshold and accuracy priority for the position source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::TrackerConfig;

/// Accuracy/power trade-off requested from the position source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyPriority {
    /// Best available accuracy regardless of power
    HighAccuracy,
    /// Balanced power and accuracy
    Balanced,
}

/// Parameters of a continuous sample subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRequest {
    /// Desired interval between samples (zero means as fast as possible)
    pub interval: Duration,
    /// Fastest interval the consumer accepts
    pub fastest_interval: Duration,
    /// Minimum displacement between delivered samples in meters
    pub min_distance_m: u32,
    /// Accuracy priority
    pub priority: AccuracyPriority,
}

impl SampleRequest {
    /// Unrestricted, maximum-accuracy request used while acquiring
    #[must_use]
    pub const fn acquisition() -> Self {
        Self {
            interval: Duration::ZERO,
            fastest_interval: Duration::ZERO,
            min_distance_m: 0,
            priority: AccuracyPriority::HighAccuracy,
        }
    }

    /// Moving-state request throttled by the active sampling filter
    #[must_use]
    pub fn moving(config: &TrackerConfig, sampling_filter_m: u32) -> Self {
        Self {
            interval: config.interval(),
            fastest_interval: config.fastest_interval(),
            min_distance_m: sampling_filter_m,
            priority: AccuracyPriority::Balanced,
        }
    }
}

/// Which timer an alarm belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmKind {
    /// One-shot timeout forcing stationary acquisition after prolonged motion
    StationaryTimeout,
    /// Repeating stationary-region poll
    StationaryPoll,
}

impl fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StationaryTimeout => f.write_str("stationary_timeout"),
            Self::StationaryPoll => f.write_str("stationary_poll"),
        }
    }
}

/// Handle identifying one alarm registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlarmHandle {
    /// Scheduler-unique registration id
    pub id: u64,
    /// Timer this registration belongs to
    pub kind: AlarmKind,
}

impl AlarmHandle {
    /// Create a handle
    #[must_use]
    pub const fn new(id: u64, kind: AlarmKind) -> Self {
        Self { id, kind }
    }
}
