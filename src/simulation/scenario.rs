// ABOUTME: JSON scenario files describing timed tracker events for deterministic replay
// ABOUTME: Runs a scenario through the simulation and reports outputs and the final state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! Scenario format:
//!
//! ```json
//! {
//!   "config": { "distance_filter_m": 50, "debug": true },
//!   "steps": [
//!     { "event": { "type": "command", "command": { "name": "start" } } },
//!     { "after_secs": 5, "event": { "type": "sample", "sample": { ... } } }
//!   ],
//!   "drain_secs": 900
//! }
//! ```
//!
//! `after_secs` is relative to the previous step. Alarms fire on their own
//! while time advances between steps.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use geopace_core::models::{TrackerEvent, TrackerOutput};
use geopace_core::{TrackerConfig, TrackingError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::harness::Simulation;
use crate::tracking::TrackerSnapshot;

/// Scenario loading or execution failure
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// File could not be read
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    /// File is not a valid scenario
    #[error("invalid scenario: {0}")]
    Json(#[from] serde_json::Error),
    /// The tracker could not be built or driven
    #[error(transparent)]
    Tracking(#[from] TrackingError),
}

/// One timed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Seconds to advance before delivering the event
    #[serde(default)]
    pub after_secs: u64,
    /// Event to deliver
    pub event: TrackerEvent,
}

/// Configuration plus a timed event trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Tracker configuration, defaults for missing fields
    #[serde(default)]
    pub config: TrackerConfig,
    /// Virtual start time, the Unix epoch when absent
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// Events in delivery order
    pub steps: Vec<ScenarioStep>,
    /// Seconds to keep time running after the last step
    #[serde(default)]
    pub drain_secs: u64,
}

/// Result of a scenario run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// Everything the sink received, in order
    pub outputs: Vec<TrackerOutput>,
    /// Alarms fired during the run
    pub alarms_fired: usize,
    /// Tracker state after the run
    pub final_state: TrackerSnapshot,
}

impl Scenario {
    /// Parse a scenario from JSON text
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::Json` on malformed input
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a scenario file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Replay the scenario on virtual time
    ///
    /// Dispatch errors are part of the replay: they show up as error outputs
    /// and do not abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or time overflows
    pub fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        let mut simulation = Simulation::starting_at(
            self.config.clone(),
            self.start.unwrap_or_default(),
        )?;
        info!(steps = self.steps.len(), "Replaying scenario");

        let mut alarms_fired = 0;
        for (index, step) in self.steps.iter().enumerate() {
            alarms_fired += simulation.advance(Duration::from_secs(step.after_secs))?;
            if let Err(error) = simulation.dispatch(step.event.clone()) {
                debug!(step = index, %error, "Scenario step failed");
            }
        }
        alarms_fired += simulation.advance(Duration::from_secs(self.drain_secs))?;

        Ok(ScenarioReport {
            outputs: simulation.recorder().outputs(),
            alarms_fired,
            final_state: simulation.snapshot(),
        })
    }
}
