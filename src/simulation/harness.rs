// ABOUTME: Simulation driver wiring a Tracker to the virtual clock, alarms and recorder
// ABOUTME: Advancing time fires due alarms in order at their exact virtual instants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use geopace_core::models::{TrackerCommand, TrackerEvent};
use geopace_core::{TrackerConfig, TrackingResult};
use tracing::{debug, warn};

use super::alarms::VirtualAlarmScheduler;
use super::clock::{offset, VirtualClock};
use super::recording::PlatformRecorder;
use crate::platform::{Clock, Collaborators};
use crate::router::Tracker;
use crate::tracking::TrackerSnapshot;

/// Tracker running on virtual time
#[derive(Debug)]
pub struct Simulation {
    tracker: Tracker,
    clock: VirtualClock,
    alarms: Arc<VirtualAlarmScheduler>,
    recorder: Arc<PlatformRecorder>,
}

impl Simulation {
    /// Simulation starting at the Unix epoch
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Config` if `config` is invalid
    pub fn new(config: TrackerConfig) -> TrackingResult<Self> {
        Self::starting_at(config, DateTime::<Utc>::default())
    }

    /// Simulation starting at `start`
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Config` if `config` is invalid
    pub fn starting_at(config: TrackerConfig, start: DateTime<Utc>) -> TrackingResult<Self> {
        let clock = VirtualClock::new(start);
        let alarms = Arc::new(VirtualAlarmScheduler::new(clock.clone()));
        let recorder = Arc::new(PlatformRecorder::new());

        let collaborators = Collaborators {
            positions: recorder.clone(),
            regions: recorder.clone(),
            alarms: alarms.clone(),
            sink: recorder.clone(),
            feedback: recorder.clone(),
            clock: Arc::new(clock.clone()),
        };

        Ok(Self {
            tracker: Tracker::new(config, collaborators)?,
            clock,
            alarms,
            recorder,
        })
    }

    /// Current virtual time
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Route one event at the current virtual time
    ///
    /// # Errors
    ///
    /// Propagates the tracker's dispatch error
    pub fn dispatch(&mut self, event: TrackerEvent) -> TrackingResult<()> {
        self.tracker.dispatch(event)
    }

    /// Route a command
    ///
    /// # Errors
    ///
    /// Propagates the tracker's dispatch error
    pub fn command(&mut self, command: TrackerCommand) -> TrackingResult<()> {
        self.dispatch(TrackerEvent::command(command))
    }

    /// Move time forward by `by`, firing every alarm that falls due
    ///
    /// Returns the number of alarms fired. Dispatch failures are already
    /// reported through the sink and do not stop the clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the target time is out of range
    pub fn advance(&mut self, by: Duration) -> TrackingResult<usize> {
        let target = offset(self.clock.now(), by)?;
        let mut fired = 0;
        while let Some((handle, due)) = self.alarms.pop_due(target) {
            self.clock.set(due);
            debug!(alarm = %handle.kind, id = handle.id, at = %due, "Virtual alarm due");
            if let Err(error) = self.tracker.dispatch(TrackerEvent::alarm(handle)) {
                warn!(%error, "Alarm dispatch failed");
            }
            fired += 1;
        }
        self.clock.set(target);
        Ok(fired)
    }

    /// Read-only view of the tracking state
    #[must_use]
    pub fn snapshot(&self) -> TrackerSnapshot {
        self.tracker.snapshot()
    }

    /// The driven tracker
    #[must_use]
    pub const fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Recorded collaborator traffic
    #[must_use]
    pub fn recorder(&self) -> &PlatformRecorder {
        &self.recorder
    }

    /// Virtual alarm scheduler
    #[must_use]
    pub fn alarms(&self) -> &VirtualAlarmScheduler {
        &self.alarms
    }
}
