// ABOUTME: Event router that feeds the state machine and executes its directives
// ABOUTME: Owns alarm registrations, rejects stale alarms and halts tracking on rejected requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! # Event Router
//!
//! [`Tracker`] is the single entry point for everything that happens to the
//! tracker. It must be driven from one logical thread of control: either
//! directly (simulation, tests) or through the
//! [`TrackerService`](crate::runtime::TrackerService) actor.

use geopace_core::models::{
    AlarmHandle, AlarmKind, TrackerCommand, TrackerEvent,
};
use geopace_core::{TrackerConfig, TrackingError, TrackingResult};
use tracing::{debug, error, warn};

use crate::platform::Collaborators;
use crate::tracking::{Directive, Directives, MotionStateMachine, TrackerSnapshot};

/// Current registration per alarm kind
#[derive(Debug, Default, Clone, Copy)]
struct AlarmSlots {
    stationary_timeout: Option<AlarmHandle>,
    polling: Option<AlarmHandle>,
}

impl AlarmSlots {
    fn slot_mut(&mut self, kind: AlarmKind) -> &mut Option<AlarmHandle> {
        match kind {
            AlarmKind::StationaryTimeout => &mut self.stationary_timeout,
            AlarmKind::StationaryPoll => &mut self.polling,
        }
    }

    const fn get(&self, kind: AlarmKind) -> Option<AlarmHandle> {
        match kind {
            AlarmKind::StationaryTimeout => self.stationary_timeout,
            AlarmKind::StationaryPoll => self.polling,
        }
    }
}

/// State machine plus the collaborators it drives
#[derive(Debug)]
pub struct Tracker {
    machine: MotionStateMachine,
    collaborators: Collaborators,
    alarms: AlarmSlots,
    region_active: bool,
}

impl Tracker {
    /// Stopped tracker
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Config` if `config` is invalid
    pub fn new(config: TrackerConfig, collaborators: Collaborators) -> TrackingResult<Self> {
        config.validate()?;
        Ok(Self {
            machine: MotionStateMachine::new(config),
            collaborators,
            alarms: AlarmSlots::default(),
            region_active: false,
        })
    }

    /// Read-only view of the tracking state
    #[must_use]
    pub fn snapshot(&self) -> TrackerSnapshot {
        self.machine.snapshot()
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &TrackerConfig {
        self.machine.config()
    }

    /// Current registration for an alarm kind
    #[must_use]
    pub const fn active_alarm(&self, kind: AlarmKind) -> Option<AlarmHandle> {
        self.alarms.get(kind)
    }

    /// Whether a region watch is registered
    #[must_use]
    pub const fn is_watching_region(&self) -> bool {
        self.region_active
    }

    /// Route one event
    ///
    /// # Errors
    ///
    /// Returns the collaborator error that halted tracking, or the
    /// configuration error of a rejected `Configure` command. Both are also
    /// reported through the sink.
    pub fn dispatch(&mut self, event: TrackerEvent) -> TrackingResult<()> {
        debug!(event = event.kind(), state = ?self.machine.state(), "Dispatching event");
        let now = self.collaborators.clock.now();

        let directives = match event {
            TrackerEvent::Sample { sample } => self.machine.on_sample(sample, now),
            TrackerEvent::PolledSample { sample } => self.machine.on_polled_sample(sample, now),
            TrackerEvent::Region { transition } => self.machine.on_region(transition),
            TrackerEvent::AlarmFired { handle } => self.on_alarm(handle),
            TrackerEvent::Command { command } => self.on_command(command)?,
        };
        self.execute(directives)
    }

    fn on_command(&mut self, command: TrackerCommand) -> TrackingResult<Directives> {
        match command {
            TrackerCommand::Start => Ok(self.machine.start()),
            TrackerCommand::Stop => Ok(self.machine.stop()),
            TrackerCommand::SwitchMode { pace } => Ok(self.machine.switch_pace(pace)),
            TrackerCommand::Configure { config } => {
                self.machine.configure(config).inspect_err(|error| {
                    warn!(%error, "Rejected configuration");
                    self.collaborators.sink.on_error(error);
                })
            }
        }
    }

    fn on_alarm(&mut self, handle: AlarmHandle) -> Directives {
        let slot = self.alarms.slot_mut(handle.kind);
        if *slot != Some(handle) {
            debug!(alarm = %handle.kind, id = handle.id, "Ignoring stale alarm");
            return Vec::new();
        }

        match handle.kind {
            AlarmKind::StationaryTimeout => {
                // One-shot: the registration is spent once it fires
                *slot = None;
                self.machine.on_stationary_timeout()
            }
            AlarmKind::StationaryPoll => {
                let now = self.collaborators.clock.now();
                self.machine.on_poll_alarm(now)
            }
        }
    }

    fn execute(&mut self, directives: Directives) -> TrackingResult<()> {
        for directive in directives {
            let label = directive.label();
            if let Err(err) = self.apply(directive) {
                if err.code().halts_tracking() {
                    error!(directive = label, error = %err, "Collaborator rejected request, halting");
                    self.collaborators.sink.on_error(&err);
                    self.halt();
                    return Err(err);
                }
                warn!(directive = label, error = %err, "Collaborator request failed");
                self.collaborators.sink.on_error(&err);
            }
        }
        Ok(())
    }

    fn halt(&mut self) {
        for directive in self.machine.halt() {
            let label = directive.label();
            if let Err(err) = self.apply(directive) {
                debug!(directive = label, error = %err, "Ignoring failure while halting");
            }
        }
    }

    fn apply(&mut self, directive: Directive) -> Result<(), TrackingError> {
        let collaborators = &self.collaborators;
        match directive {
            Directive::RequestSamples(request) => collaborators.positions.request_samples(&request)?,
            Directive::CancelSamples => collaborators.positions.cancel_samples(),
            Directive::RequestSingleSample => collaborators.positions.request_single_sample()?,
            Directive::WatchRegion { center, radius_m } => {
                if self.region_active {
                    collaborators.regions.cancel_watch();
                    self.region_active = false;
                }
                collaborators.regions.register_watch(&center, radius_m)?;
                self.region_active = true;
            }
            Directive::CancelRegionWatch => {
                if self.region_active {
                    collaborators.regions.cancel_watch();
                    self.region_active = false;
                }
            }
            Directive::ArmStationaryTimeout { delay } => {
                self.cancel_alarm(AlarmKind::StationaryTimeout);
                let handle = self
                    .collaborators
                    .alarms
                    .schedule_once(AlarmKind::StationaryTimeout, delay)?;
                self.alarms.stationary_timeout = Some(handle);
            }
            Directive::CancelStationaryTimeout => self.cancel_alarm(AlarmKind::StationaryTimeout),
            Directive::ArmPolling {
                first_delay,
                interval,
            } => {
                self.cancel_alarm(AlarmKind::StationaryPoll);
                let handle = self.collaborators.alarms.schedule_repeating(
                    AlarmKind::StationaryPoll,
                    first_delay,
                    interval,
                )?;
                self.alarms.polling = Some(handle);
            }
            Directive::CancelPolling => self.cancel_alarm(AlarmKind::StationaryPoll),
            Directive::EmitLocation(sample) => collaborators.sink.on_location(&sample),
            Directive::EmitStationary(fix) => collaborators.sink.on_stationary(&fix),
            Directive::Cue(cue) => {
                if self.machine.config().debug {
                    collaborators.feedback.notify(&cue);
                }
            }
        }
        Ok(())
    }

    fn cancel_alarm(&mut self, kind: AlarmKind) {
        if let Some(handle) = self.alarms.slot_mut(kind).take() {
            self.collaborators.alarms.cancel(handle);
        }
    }
}
