// ABOUTME: In-memory collaborator that records every request, output and debug cue
// ABOUTME: Can be told to deny position or region requests to exercise the halting path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use geopace_core::models::{
    DebugCue, PositionSample, SampleRequest, StationaryFix, TrackerOutput,
};
use geopace_core::{TrackingError, TrackingResult};

use crate::platform::{DebugFeedback, LocationSink, PositionSource, RegionWatcher};

/// One observed collaborator call
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    /// Continuous subscription requested
    SamplesRequested(SampleRequest),
    /// Continuous subscription cancelled
    SamplesCancelled,
    /// Single poll sample requested
    SingleSampleRequested,
    /// Region watch registered
    WatchRegistered {
        /// Region center
        center: PositionSample,
        /// Region radius in meters
        radius_m: f64,
    },
    /// Region watch cancelled
    WatchCancelled,
    /// Sink output
    Output(TrackerOutput),
    /// Debug cue
    Cue(DebugCue),
}

/// Position source, region watcher, sink and feedback in one recorder
#[derive(Debug, Default)]
pub struct PlatformRecorder {
    calls: Mutex<Vec<Recorded>>,
    deny_positions: AtomicBool,
    deny_regions: AtomicBool,
}

impl PlatformRecorder {
    /// Empty recorder accepting every request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject position requests as unauthorized
    pub fn deny_positions(&self, deny: bool) {
        self.deny_positions.store(deny, Ordering::SeqCst);
    }

    /// Reject region registrations as unauthorized
    pub fn deny_regions(&self, deny: bool) {
        self.deny_regions.store(deny, Ordering::SeqCst);
    }

    /// Every call so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<Recorded> {
        self.lock().clone()
    }

    /// Forget recorded calls
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Sink outputs so far
    #[must_use]
    pub fn outputs(&self) -> Vec<TrackerOutput> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                Recorded::Output(output) => Some(output.clone()),
                _ => None,
            })
            .collect()
    }

    /// Debug cues so far
    #[must_use]
    pub fn cues(&self) -> Vec<DebugCue> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                Recorded::Cue(cue) => Some(cue.clone()),
                _ => None,
            })
            .collect()
    }

    /// Most recent continuous subscription request
    #[must_use]
    pub fn last_sample_request(&self) -> Option<SampleRequest> {
        self.lock().iter().rev().find_map(|call| match call {
            Recorded::SamplesRequested(request) => Some(*request),
            _ => None,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Recorded>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: Recorded) {
        self.lock().push(call);
    }
}

impl PositionSource for PlatformRecorder {
    fn request_samples(&self, request: &SampleRequest) -> TrackingResult<()> {
        if self.deny_positions.load(Ordering::SeqCst) {
            return Err(TrackingError::authorization_denied("request_samples"));
        }
        self.record(Recorded::SamplesRequested(*request));
        Ok(())
    }

    fn cancel_samples(&self) {
        self.record(Recorded::SamplesCancelled);
    }

    fn request_single_sample(&self) -> TrackingResult<()> {
        if self.deny_positions.load(Ordering::SeqCst) {
            return Err(TrackingError::authorization_denied("request_single_sample"));
        }
        self.record(Recorded::SingleSampleRequested);
        Ok(())
    }
}

impl RegionWatcher for PlatformRecorder {
    fn register_watch(&self, center: &PositionSample, radius_m: f64) -> TrackingResult<()> {
        if self.deny_regions.load(Ordering::SeqCst) {
            return Err(TrackingError::authorization_denied("register_watch"));
        }
        self.record(Recorded::WatchRegistered {
            center: *center,
            radius_m,
        });
        Ok(())
    }

    fn cancel_watch(&self) {
        self.record(Recorded::WatchCancelled);
    }
}

impl LocationSink for PlatformRecorder {
    fn on_location(&self, sample: &PositionSample) {
        self.record(Recorded::Output(TrackerOutput::Location { sample: *sample }));
    }

    fn on_stationary(&self, fix: &StationaryFix) {
        self.record(Recorded::Output(TrackerOutput::Stationary { fix: *fix }));
    }

    fn on_error(&self, error: &TrackingError) {
        self.record(Recorded::Output(TrackerOutput::from(error)));
    }
}

impl DebugFeedback for PlatformRecorder {
    fn notify(&self, cue: &DebugCue) {
        self.record(Recorded::Cue(cue.clone()));
    }
}
