// ABOUTME: Output adapters: a broadcast sink fanning tracker output to subscribers
// ABOUTME: and a debug feedback channel that renders cues as tracing events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use geopace_core::models::{DebugCue, PositionSample, StationaryFix, TrackerOutput};
use geopace_core::TrackingError;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::platform::{DebugFeedback, LocationSink};

/// Sink publishing every output on a broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<TrackerOutput>,
}

impl BroadcastSink {
    /// Sink buffering up to `buffer_size` outputs per subscriber
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size);
        Self { sender }
    }

    /// Subscribe to tracker output
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerOutput> {
        self.sender.subscribe()
    }

    fn publish(&self, output: TrackerOutput) {
        if self.sender.send(output).is_err() {
            debug!("No output subscribers, dropping tracker output");
        }
    }
}

impl LocationSink for BroadcastSink {
    fn on_location(&self, sample: &PositionSample) {
        self.publish(TrackerOutput::Location { sample: *sample });
    }

    fn on_stationary(&self, fix: &StationaryFix) {
        self.publish(TrackerOutput::Stationary { fix: *fix });
    }

    fn on_error(&self, error: &TrackingError) {
        self.publish(TrackerOutput::from(error));
    }
}

/// Renders debug cues as `info` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedback;

impl DebugFeedback for TracingFeedback {
    fn notify(&self, cue: &DebugCue) {
        match cue {
            DebugCue::Message(text) => info!(target: "geopace::debug", "{text}"),
            tone => info!(target: "geopace::debug", cue = ?tone, "Debug tone"),
        }
    }
}
