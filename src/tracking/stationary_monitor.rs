// ABOUTME: Stationary region watch with an alarm-driven polling fallback
// ABOUTME: Computes boundary distance from polled samples and paces polling lazy or aggressive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! Stationary region monitoring.
//!
//! Event-based region notifications are unreliable while the host is
//! suspended, so a stationary region is watched through two channels: the
//! region watcher's `exited` event, and a repeating poll alarm that asks for
//! one high-accuracy sample and measures it against the fix. Either channel
//! can end the stationary period.

use chrono::{DateTime, Utc};
use geopace_core::constants::timers::POLLING_START_DELAY;
use geopace_core::models::{PollingMode, PollingSchedule, PositionSample, StationaryFix};
use geopace_core::TrackerConfig;
use tracing::{debug, info};

use super::directives::{Directive, Directives};

/// Verdict on one polled sample
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The sample lies beyond the stationary radius
    Exited {
        /// Measured boundary distance in meters
        distance_m: f64,
    },
    /// The sample is still inside the region
    Inside {
        /// Measured boundary distance in meters
        distance_m: f64,
        /// Refreshed fix to emit when the update interval has elapsed
        refresh: Option<StationaryFix>,
        /// Poll re-pacing, empty when the pacing is unchanged
        directives: Directives,
    },
}

/// Owns the polling schedule and region-watch bookkeeping
#[derive(Debug, Clone, Default)]
pub struct StationaryRegionMonitor {
    schedule: Option<PollingSchedule>,
    watching: bool,
}

impl StationaryRegionMonitor {
    /// Idle monitor
    #[must_use]
    pub const fn new() -> Self {
        Self {
            schedule: None,
            watching: false,
        }
    }

    /// Whether a region watch is registered
    #[must_use]
    pub const fn is_watching(&self) -> bool {
        self.watching
    }

    /// Active polling schedule
    #[must_use]
    pub const fn schedule(&self) -> Option<&PollingSchedule> {
        self.schedule.as_ref()
    }

    /// Start watching `fix` and poll lazily
    ///
    /// Engaging while already engaged replaces the watch and the schedule.
    pub fn engage(&mut self, fix: &StationaryFix, config: &TrackerConfig) -> Directives {
        info!(
            lat = fix.location.latitude,
            lon = fix.location.longitude,
            radius_m = fix.radius,
            replacing = self.watching,
            "Monitoring stationary region"
        );
        self.watching = true;
        let schedule = PollingSchedule::new(PollingMode::Lazy, config.lazy_poll_interval());
        self.schedule = Some(schedule);

        vec![
            Directive::WatchRegion {
                center: fix.location,
                radius_m: fix.radius,
            },
            Directive::ArmPolling {
                first_delay: POLLING_START_DELAY,
                interval: schedule.interval,
            },
        ]
    }

    /// Stop watching and polling
    pub fn disengage(&mut self) -> Directives {
        if self.watching || self.schedule.is_some() {
            debug!("Releasing stationary region watch and poll");
        }
        self.watching = false;
        self.schedule = None;
        vec![Directive::CancelPolling, Directive::CancelRegionWatch]
    }

    /// Note that the poll alarm fired
    pub fn record_poll_fired(&mut self, now: DateTime<Utc>) {
        if let Some(schedule) = self.schedule.as_mut() {
            schedule.last_fire_time = Some(now);
        }
    }

    /// Distance used for the exit decision
    ///
    /// `|distance(sample, center) - fix accuracy - sample accuracy|`. The
    /// absolute value treats an under-shoot and an over-shoot of equal size
    /// identically; it is kept as the established heuristic, not as an exact
    /// geometric test.
    #[must_use]
    pub fn boundary_distance(fix: &StationaryFix, sample: &PositionSample) -> f64 {
        (sample.distance_to(&fix.location) - fix.location.accuracy - sample.accuracy).abs()
    }

    /// Evaluate a polled sample against the watched fix
    pub fn on_polled_sample(
        &mut self,
        fix: &StationaryFix,
        sample: &PositionSample,
        last_update: DateTime<Utc>,
        now: DateTime<Utc>,
        config: &TrackerConfig,
    ) -> PollOutcome {
        let distance_m = Self::boundary_distance(fix, sample);
        info!(distance_m, radius_m = config.stationary_radius_m, "Distance from stationary location");

        if distance_m > config.stationary_radius_m {
            return PollOutcome::Exited { distance_m };
        }

        let stationary_for = now.signed_duration_since(last_update);
        let refresh = stationary_for
            .to_std()
            .is_ok_and(|elapsed| elapsed >= config.stationary_update_interval())
            .then(|| fix.refreshed(*sample));
        if refresh.is_some() {
            debug!(
                minutes = stationary_for.num_minutes(),
                "Stationary update interval elapsed, refreshing fix"
            );
        }

        PollOutcome::Inside {
            distance_m,
            refresh,
            directives: self.repace(distance_m, config),
        }
    }

    /// Switch pacing when the boundary distance crosses zero
    fn repace(&mut self, distance_m: f64, config: &TrackerConfig) -> Directives {
        let target = if distance_m > 0.0 {
            PollingMode::Aggressive
        } else {
            PollingMode::Lazy
        };

        let Some(schedule) = self.schedule.as_mut() else {
            return Vec::new();
        };
        if schedule.mode == target {
            return Vec::new();
        }

        let interval = match target {
            PollingMode::Lazy => config.lazy_poll_interval(),
            PollingMode::Aggressive => config.aggressive_poll_interval(),
        };
        info!(from = ?schedule.mode, to = ?target, interval_secs = interval.as_secs(), "Re-pacing stationary poll");
        *schedule = PollingSchedule {
            mode: target,
            interval,
            last_fire_time: schedule.last_fire_time,
        };

        vec![Directive::ArmPolling {
            first_delay: POLLING_START_DELAY,
            interval,
        }]
    }
}
