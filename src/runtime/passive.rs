// ABOUTME: Position source and region watcher that only record requests in the log
// ABOUTME: Used when samples and region events are fed from outside, e.g. JSON lines on stdin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use geopace_core::models::{PositionSample, SampleRequest};
use geopace_core::TrackingResult;
use tracing::info;

use crate::platform::{PositionSource, RegionWatcher};

/// Accepts every subscription and logs it
#[derive(Debug, Clone, Copy, Default)]
pub struct PassivePositionSource;

impl PositionSource for PassivePositionSource {
    fn request_samples(&self, request: &SampleRequest) -> TrackingResult<()> {
        info!(
            interval_ms = request.interval.as_millis(),
            fastest_interval_ms = request.fastest_interval.as_millis(),
            min_distance_m = request.min_distance_m,
            priority = ?request.priority,
            "Sample subscription requested"
        );
        Ok(())
    }

    fn cancel_samples(&self) {
        info!("Sample subscription cancelled");
    }

    fn request_single_sample(&self) -> TrackingResult<()> {
        info!("Single high-accuracy sample requested");
        Ok(())
    }
}

/// Accepts every region watch and logs it
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveRegionWatcher;

impl RegionWatcher for PassiveRegionWatcher {
    fn register_watch(&self, center: &PositionSample, radius_m: f64) -> TrackingResult<()> {
        info!(
            lat = center.latitude,
            lon = center.longitude,
            radius_m,
            "Region watch requested"
        );
        Ok(())
    }

    fn cancel_watch(&self) {
        info!("Region watch cancelled");
    }
}
