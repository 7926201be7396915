// ABOUTME: Collaborator traits the tracker drives: position source, region watcher, alarms, sink
// ABOUTME: Adapters implement these for a real platform, the tokio runtime or the simulation harness
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! # Platform Collaborators
//!
//! The tracker never talks to hardware directly. Every side effect goes
//! through one of the traits below, and every answer comes back as a
//! [`TrackerEvent`](geopace_core::models::TrackerEvent) on the tracker's
//! queue. Requests are fire-and-forget: a successful return only means the
//! request was registered. A `TrackingError::AuthorizationDenied` return
//! halts tracking.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use geopace_core::models::{
    AlarmHandle, AlarmKind, DebugCue, PositionSample, SampleRequest, StationaryFix,
};
use geopace_core::{TrackingError, TrackingResult};

/// Source of position samples
pub trait PositionSource: Send + Sync {
    /// Replace the continuous subscription with `request`
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the subscription
    fn request_samples(&self, request: &SampleRequest) -> TrackingResult<()>;

    /// Drop the continuous subscription; idempotent
    fn cancel_samples(&self);

    /// Ask for one high-accuracy sample, delivered as a polled sample event
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the request
    fn request_single_sample(&self) -> TrackingResult<()>;
}

/// Circular geofence watcher
pub trait RegionWatcher: Send + Sync {
    /// Watch the circle around `center`
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the registration
    fn register_watch(&self, center: &PositionSample, radius_m: f64) -> TrackingResult<()>;

    /// Remove the watch; idempotent
    fn cancel_watch(&self);
}

/// Timer service delivering `AlarmFired` events
pub trait AlarmScheduler: Send + Sync {
    /// Fire once after `delay`
    ///
    /// # Errors
    ///
    /// Returns an error if the timer could not be armed
    fn schedule_once(&self, kind: AlarmKind, delay: Duration) -> TrackingResult<AlarmHandle>;

    /// Fire after `first_delay`, then every `interval`
    ///
    /// # Errors
    ///
    /// Returns an error if the timer could not be armed
    fn schedule_repeating(
        &self,
        kind: AlarmKind,
        first_delay: Duration,
        interval: Duration,
    ) -> TrackingResult<AlarmHandle>;

    /// Cancel a registration; unknown handles are ignored
    fn cancel(&self, handle: AlarmHandle);
}

/// Receiver of everything the tracker emits
pub trait LocationSink: Send + Sync {
    /// Accepted moving fix
    fn on_location(&self, sample: &PositionSample);
    /// Confirmed or refreshed stationary fix
    fn on_stationary(&self, fix: &StationaryFix);
    /// Error notification
    fn on_error(&self, error: &TrackingError);
}

/// Audible or visual feedback, only driven when debugging is on
pub trait DebugFeedback: Send + Sync {
    /// Play or show a cue
    fn notify(&self, cue: &DebugCue);
}

/// Wall clock
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Everything the router needs to act on the outside world
#[derive(Clone)]
pub struct Collaborators {
    /// Position samples
    pub positions: Arc<dyn PositionSource>,
    /// Region watch
    pub regions: Arc<dyn RegionWatcher>,
    /// Timers
    pub alarms: Arc<dyn AlarmScheduler>,
    /// Output
    pub sink: Arc<dyn LocationSink>,
    /// Debug cues
    pub feedback: Arc<dyn DebugFeedback>,
    /// Time source
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
