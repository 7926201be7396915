// ABOUTME: Motion-state machine switching between moving and stationary tracking
// ABOUTME: Owns all tracking state and turns events into ordered collaborator directives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! # Motion State Machine
//!
//! ```text
//!   start / lazy ──► ACQUIRING_STATIONARY ──(1 sample)──► STATIONARY
//!                          ▲                                  │ exit (event or poll)
//!   timeout / enter ───────┘                                  ▼
//!                       MOVING ◄──(3 samples)──────────── ACQUIRING_SPEED
//! ```
//!
//! The machine performs no I/O. Every operation returns the [`Directives`]
//! the router must execute, in order, against the external collaborators.
//! All mutable tracking state lives here; other components only read a
//! [`TrackerSnapshot`].

use chrono::{DateTime, Utc};
use geopace_core::constants::distance_filter::MAX_DISTANCE_FILTER_M;
use geopace_core::constants::motion::MIN_RESET_SPEED_MPS;
use geopace_core::constants::timers::STATIONARY_TIMEOUT;
use geopace_core::models::{
    AcquisitionTarget, DebugCue, Pace, PollingSchedule, PositionSample, RegionTransition,
    SampleRequest, StationaryFix, TrackingState,
};
use geopace_core::{TrackerConfig, TrackingResult};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::acquisition::{AcquisitionController, AcquisitionSession, AttemptOutcome};
use super::directives::{Directive, Directives};
use super::distance_filter::DistanceFilterCalculator;
use super::stationary_monitor::{PollOutcome, StationaryRegionMonitor};

/// Read-only view of the tracking state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    /// Incremented on every state change
    pub version: u64,
    /// Active mode, `None` while stopped
    pub state: Option<TrackingState>,
    /// In-flight acquisition session
    pub acquisition: Option<AcquisitionSession>,
    /// Confirmed stationary fix of the current cycle
    pub stationary_fix: Option<StationaryFix>,
    /// Active moving-state distance filter in meters
    pub sampling_filter_m: u32,
    /// Last fix forwarded while moving
    pub last_accepted: Option<PositionSample>,
    /// Last stationary emission
    pub last_stationary_update: Option<DateTime<Utc>>,
    /// Stationary poll pacing
    pub polling: Option<PollingSchedule>,
}

/// Adaptive motion-state scheduler
#[derive(Debug, Clone)]
pub struct MotionStateMachine {
    config: TrackerConfig,
    state: Option<TrackingState>,
    acquisition: AcquisitionController,
    monitor: StationaryRegionMonitor,
    stationary_fix: Option<StationaryFix>,
    sampling_filter_m: u32,
    last_accepted: Option<PositionSample>,
    last_stationary_update: Option<DateTime<Utc>>,
    version: u64,
}

impl MotionStateMachine {
    /// Stopped machine using `config`
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        let sampling_filter_m = config.distance_filter_m.min(MAX_DISTANCE_FILTER_M);
        Self {
            config,
            state: None,
            acquisition: AcquisitionController::new(),
            monitor: StationaryRegionMonitor::new(),
            stationary_fix: None,
            sampling_filter_m,
            last_accepted: None,
            last_stationary_update: None,
            version: 0,
        }
    }

    /// Active configuration snapshot
    #[must_use]
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Active mode, `None` while stopped
    #[must_use]
    pub const fn state(&self) -> Option<TrackingState> {
        self.state
    }

    /// Whether tracking is on
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.is_some()
    }

    /// Copy of the full tracking state
    #[must_use]
    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            version: self.version,
            state: self.state,
            acquisition: self.acquisition.session().copied(),
            stationary_fix: self.stationary_fix,
            sampling_filter_m: self.sampling_filter_m,
            last_accepted: self.last_accepted,
            last_stationary_update: self.last_stationary_update,
            polling: self.monitor.schedule().copied(),
        }
    }

    /// Begin tracking in the lazy track; a no-op when already running
    pub fn start(&mut self) -> Directives {
        if self.is_running() {
            debug!("Start requested while already tracking");
            return Vec::new();
        }
        info!(distance_filter_m = self.config.distance_filter_m, "Start recording");
        self.sampling_filter_m = self.config.distance_filter_m.min(MAX_DISTANCE_FILTER_M);
        let directives = self.enter_lazy_track();
        self.check_invariants();
        directives
    }

    /// Stop tracking and cancel every registration; a no-op when stopped
    pub fn stop(&mut self) -> Directives {
        if !self.is_running() {
            debug!("Stop requested while already stopped");
            return Vec::new();
        }
        info!(state = ?self.state, "Stop recording");
        self.shut_down()
    }

    /// Stop after a collaborator rejected a request
    pub fn halt(&mut self) -> Directives {
        warn!(state = ?self.state, "Tracking halted until re-enabled");
        self.shut_down()
    }

    /// Force the aggressive or lazy track, discarding in-flight acquisition
    pub fn switch_pace(&mut self, pace: Pace) -> Directives {
        if !self.is_running() {
            if pace == Pace::Lazy {
                return self.start();
            }
            debug!(?pace, "Mode switch ignored while stopped");
            return Vec::new();
        }
        info!(?pace, "Setting pace");
        let directives = match pace {
            Pace::Aggressive => self.enter_aggressive_track(),
            Pace::Lazy => self.enter_lazy_track(),
        };
        self.check_invariants();
        directives
    }

    /// Replace the configuration, restarting when a relevant field changed
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Config` when the new configuration is invalid;
    /// the active configuration is kept in that case.
    pub fn configure(&mut self, config: TrackerConfig) -> TrackingResult<Directives> {
        config.validate()?;
        let restart = self.config.requires_restart(&config);
        self.config = config;

        if !(restart && self.is_running()) {
            return Ok(Vec::new());
        }
        info!("Configuration changed, restarting tracker");
        let mut directives = self.stop();
        directives.extend(self.start());
        Ok(directives)
    }

    /// Handle a sample from the continuous subscription
    pub fn on_sample(&mut self, sample: PositionSample, now: DateTime<Utc>) -> Directives {
        if !self.is_running() {
            debug!("Sample ignored while stopped");
            return Vec::new();
        }
        if let Err(error) = sample.validate() {
            debug!(%error, "Discarding invalid sample");
            return Vec::new();
        }

        let mut directives = Vec::new();
        if self.state == Some(TrackingState::Stationary) && self.stationary_fix.is_none() {
            info!("Sample without a stationary fix, re-acquiring stationary location");
            directives.extend(self.enter_lazy_track());
        }

        directives.push(Directive::Cue(DebugCue::Message(format!(
            "mv:{},acy:{},v:{},df:{}",
            self.state.is_some_and(TrackingState::is_moving_track),
            sample.accuracy,
            sample.speed,
            self.sampling_filter_m
        ))));

        match self.state {
            Some(TrackingState::AcquiringStationary) => {
                directives.extend(self.on_stationary_candidate(sample, now));
            }
            Some(TrackingState::AcquiringSpeed) => {
                directives.extend(self.on_speed_candidate(sample));
            }
            Some(TrackingState::Moving) => directives.extend(self.on_moving_sample(sample)),
            Some(TrackingState::Stationary) | None => {
                debug!("Sample ignored while stationary; polling owns this state");
            }
        }
        self.check_invariants();
        directives
    }

    /// Handle a sample answering a stationary poll
    pub fn on_polled_sample(&mut self, sample: PositionSample, now: DateTime<Utc>) -> Directives {
        if self.state != Some(TrackingState::Stationary) {
            debug!(state = ?self.state, "Polled sample ignored outside stationary state");
            return Vec::new();
        }
        if let Err(error) = sample.validate() {
            debug!(%error, "Discarding invalid polled sample");
            return Vec::new();
        }
        let Some(fix) = self.stationary_fix else {
            return Vec::new();
        };

        let last_update = *self.last_stationary_update.get_or_insert(now);
        let mut directives = vec![Directive::Cue(DebugCue::Beep)];
        let outcome =
            self.monitor
                .on_polled_sample(&fix, &sample, last_update, now, &self.config);

        match outcome {
            PollOutcome::Exited { distance_m } => {
                directives.push(self.exit_countdown_cue(distance_m));
                directives.extend(self.exit_stationary_region(&sample));
            }
            PollOutcome::Inside {
                distance_m,
                refresh,
                directives: repacing,
            } => {
                directives.push(self.exit_countdown_cue(distance_m));
                if let Some(refreshed) = refresh {
                    self.last_stationary_update = Some(now);
                    self.version += 1;
                    directives.push(Directive::EmitStationary(refreshed));
                }
                directives.extend(repacing);
            }
        }
        self.check_invariants();
        directives
    }

    /// Handle a region watcher notification
    pub fn on_region(&mut self, transition: RegionTransition) -> Directives {
        let Some(state) = self.state else {
            debug!(?transition, "Region event ignored while stopped");
            return Vec::new();
        };

        let directives = match transition {
            RegionTransition::Entered if state.is_moving_track() => {
                info!("Entered stationary region while moving");
                self.enter_lazy_track()
            }
            RegionTransition::Entered => {
                debug!(%state, "Region entry ignored");
                Vec::new()
            }
            RegionTransition::Exited => match self.stationary_fix {
                Some(fix) => self.exit_stationary_region(&fix.location),
                None => {
                    debug!(%state, "Region exit ignored without a stationary fix");
                    Vec::new()
                }
            },
        };
        self.check_invariants();
        directives
    }

    /// Handle the stationary timeout alarm
    pub fn on_stationary_timeout(&mut self) -> Directives {
        match self.state {
            Some(state) if state.is_moving_track() => {
                info!("Stationary timeout fired");
                let directives = self.enter_lazy_track();
                self.check_invariants();
                directives
            }
            state => {
                debug!(?state, "Stationary timeout ignored");
                Vec::new()
            }
        }
    }

    /// Handle the stationary poll alarm
    pub fn on_poll_alarm(&mut self, now: DateTime<Utc>) -> Directives {
        if self.state != Some(TrackingState::Stationary) {
            debug!(state = ?self.state, "Stationary poll ignored");
            return Vec::new();
        }
        info!("Stationary location monitor fired");
        self.monitor.record_poll_fired(now);
        vec![
            Directive::Cue(DebugCue::Dialtone),
            Directive::RequestSingleSample,
        ]
    }

    fn shut_down(&mut self) -> Directives {
        self.state = None;
        self.acquisition.reset();
        self.stationary_fix = None;
        self.version += 1;

        let mut directives = vec![Directive::CancelSamples, Directive::CancelStationaryTimeout];
        directives.extend(self.monitor.disengage());
        directives
    }

    fn enter_lazy_track(&mut self) -> Directives {
        self.stationary_fix = None;
        self.acquisition.begin(AcquisitionTarget::Stationary);
        self.transition(TrackingState::AcquiringStationary);

        let mut directives = vec![Directive::CancelSamples, Directive::CancelStationaryTimeout];
        directives.extend(self.monitor.disengage());
        directives.push(Directive::RequestSamples(SampleRequest::acquisition()));
        directives
    }

    fn enter_aggressive_track(&mut self) -> Directives {
        let was_moving = self.state.is_some_and(TrackingState::is_moving_track);
        self.stationary_fix = None;

        let mut directives = vec![Directive::CancelSamples];
        directives.extend(self.monitor.disengage());

        if was_moving {
            // Already on the moving track: keep the trusted speed, no re-acquisition
            self.acquisition.reset();
            directives.extend(self.enter_moving());
        } else {
            self.acquisition.begin(AcquisitionTarget::Speed);
            self.transition(TrackingState::AcquiringSpeed);
            directives.push(Directive::RequestSamples(SampleRequest::acquisition()));
        }
        directives
    }

    fn enter_moving(&mut self) -> Directives {
        self.transition(TrackingState::Moving);
        vec![
            Directive::RequestSamples(SampleRequest::moving(&self.config, self.sampling_filter_m)),
            Directive::ArmStationaryTimeout {
                delay: STATIONARY_TIMEOUT,
            },
        ]
    }

    fn on_stationary_candidate(&mut self, sample: PositionSample, now: DateTime<Utc>) -> Directives {
        match self.record_attempt(sample) {
            Some(AttemptOutcome::Commit(best)) => self.commit_stationary(best, now),
            Some(AttemptOutcome::Pending {
                attempts_made,
                attempts_required,
            }) => {
                debug!(attempts_made, attempts_required, "Unacceptable stationary location, waiting for another");
                vec![Directive::Cue(DebugCue::Beep)]
            }
            None => Vec::new(),
        }
    }

    fn commit_stationary(&mut self, best: PositionSample, now: DateTime<Utc>) -> Directives {
        let fix = StationaryFix::new(best, self.config.stationary_radius_m);
        self.stationary_fix = Some(fix);
        self.last_stationary_update = Some(now);
        self.transition(TrackingState::Stationary);

        let mut directives = vec![Directive::CancelSamples, Directive::CancelStationaryTimeout];
        directives.extend(self.monitor.engage(&fix, &self.config));
        directives.push(Directive::EmitStationary(fix));
        directives
    }

    fn on_speed_candidate(&mut self, sample: PositionSample) -> Directives {
        match self.record_attempt(sample) {
            Some(AttemptOutcome::Commit(latest)) => {
                self.sampling_filter_m =
                    DistanceFilterCalculator::calculate(latest.speed, self.config.distance_filter_m);
                info!(
                    speed_mps = latest.speed,
                    filter_m = self.sampling_filter_m,
                    "Speed confirmed"
                );

                let mut directives = vec![Directive::Cue(DebugCue::DoodlyDoo), Directive::CancelSamples];
                directives.extend(self.enter_moving());
                directives.extend(self.accept(latest));
                directives
            }
            Some(AttemptOutcome::Pending {
                attempts_made,
                attempts_required,
            }) => {
                debug!(attempts_made, attempts_required, "Acquiring speed");
                vec![Directive::Cue(DebugCue::Beep)]
            }
            None => Vec::new(),
        }
    }

    /// Every qualifying sample re-arms the stationary timeout, not only the
    /// first one after entering `MOVING`, so steady movement keeps postponing it.
    fn on_moving_sample(&mut self, sample: PositionSample) -> Directives {
        let mut directives = vec![Directive::Cue(DebugCue::Beep)];

        // Only accurate, moving samples may postpone the timeout; spurious fixes
        // while stopped must not keep the tracker on the moving track.
        if sample.speed >= MIN_RESET_SPEED_MPS && sample.accuracy <= self.config.stationary_radius_m {
            directives.push(Directive::ArmStationaryTimeout {
                delay: STATIONARY_TIMEOUT,
            });
        }

        let filter_m = DistanceFilterCalculator::calculate(sample.speed, self.config.distance_filter_m);
        if filter_m != self.sampling_filter_m {
            info!(new = filter_m, old = self.sampling_filter_m, "Updating distance filter");
            self.sampling_filter_m = filter_m;
            self.version += 1;
            directives.push(Directive::CancelSamples);
            directives.push(Directive::RequestSamples(SampleRequest::moving(
                &self.config,
                filter_m,
            )));
        }

        if let Some(last) = self.last_accepted {
            let moved_m = sample.distance_to(&last);
            if moved_m < f64::from(self.sampling_filter_m) {
                debug!(moved_m, filter_m = self.sampling_filter_m, "Sample inside distance filter, discarding");
                return directives;
            }
        }
        directives.extend(self.accept(sample));
        directives
    }

    fn exit_stationary_region(&mut self, at: &PositionSample) -> Directives {
        if self.state != Some(TrackingState::Stationary) {
            debug!(state = ?self.state, "Stationary exit ignored");
            return Vec::new();
        }
        info!(
            lat = at.latitude,
            lon = at.longitude,
            accuracy_m = at.accuracy,
            "Exited stationary region"
        );
        let mut directives = vec![Directive::Cue(DebugCue::BeepBeepBeep)];
        directives.extend(self.enter_aggressive_track());
        directives
    }

    fn accept(&mut self, sample: PositionSample) -> Directives {
        self.last_accepted = Some(sample);
        self.version += 1;
        vec![Directive::EmitLocation(sample)]
    }

    fn record_attempt(&mut self, sample: PositionSample) -> Option<AttemptOutcome> {
        debug_assert!(
            self.acquisition.session().is_some(),
            "acquiring state without an acquisition session"
        );
        self.acquisition.record_attempt(sample)
    }

    fn exit_countdown_cue(&self, distance_m: f64) -> Directive {
        Directive::Cue(DebugCue::Message(format!(
            "Stationary exit in {:.1}m",
            self.config.stationary_radius_m - distance_m
        )))
    }

    fn transition(&mut self, next: TrackingState) {
        if self.state != Some(next) {
            info!(from = ?self.state, to = %next, "Tracking state transition");
        }
        self.state = Some(next);
        self.version += 1;
    }

    fn check_invariants(&self) {
        let session_state = self
            .acquisition
            .target()
            .map(AcquisitionTarget::acquiring_state);
        match self.state {
            Some(state) if state.is_acquiring() => debug_assert_eq!(
                session_state,
                Some(state),
                "acquisition session does not match the acquiring state"
            ),
            _ => debug_assert!(
                session_state.is_none(),
                "acquisition session outside an acquiring state"
            ),
        }
        if let Some(fix) = self.stationary_fix {
            debug_assert!(
                fix.radius >= self.config.stationary_radius_m,
                "stationary radius below configured minimum"
            );
        }
    }
}
