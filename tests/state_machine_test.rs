// ABOUTME: Tests for the motion-state machine transitions and the directives they produce
// ABOUTME: Drives the pure machine directly without collaborators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use chrono::TimeDelta;
use common::{sample, sample_at, t0};
use geopace::tracking::{Directive, MotionStateMachine};
use geopace::TrackerConfig;
use geopace_core::models::{
    AcquisitionTarget, AccuracyPriority, DebugCue, Pace, PollingMode, RegionTransition,
    SampleRequest, StationaryFix, TrackingState,
};
use geopace_core::TrackingError;

/// Directives without debug cues
fn effects(directives: Vec<Directive>) -> Vec<Directive> {
    directives
        .into_iter()
        .filter(|directive| !matches!(directive, Directive::Cue(_)))
        .collect()
}

fn cues(directives: &[Directive]) -> Vec<DebugCue> {
    directives
        .iter()
        .filter_map(|directive| match directive {
            Directive::Cue(cue) => Some(cue.clone()),
            _ => None,
        })
        .collect()
}

fn started() -> MotionStateMachine {
    let mut machine = MotionStateMachine::new(TrackerConfig::default());
    machine.start();
    machine
}

fn stationary() -> MotionStateMachine {
    let mut machine = started();
    machine.on_sample(sample(20.0, 0.0), t0());
    assert_eq!(machine.state(), Some(TrackingState::Stationary));
    machine
}

fn moving() -> MotionStateMachine {
    let mut machine = stationary();
    machine.on_region(RegionTransition::Exited);
    for step in 0..3 {
        machine.on_sample(sample_at(f64::from(step) * 100.0 + 500.0, 10.0, 10.0), t0());
    }
    assert_eq!(machine.state(), Some(TrackingState::Moving));
    machine
}

#[test]
fn test_start_enters_acquiring_stationary() {
    let mut machine = MotionStateMachine::new(TrackerConfig::default());
    let directives = machine.start();

    assert_eq!(machine.state(), Some(TrackingState::AcquiringStationary));
    assert_eq!(
        directives,
        vec![
            Directive::CancelSamples,
            Directive::CancelStationaryTimeout,
            Directive::CancelPolling,
            Directive::CancelRegionWatch,
            Directive::RequestSamples(SampleRequest::acquisition()),
        ]
    );
    let snapshot = machine.snapshot();
    assert_eq!(
        snapshot.acquisition.map(|session| session.target),
        Some(AcquisitionTarget::Stationary)
    );
    assert_eq!(snapshot.sampling_filter_m, 500);
}

#[test]
fn test_redundant_start_and_stop_are_noops() {
    let mut machine = MotionStateMachine::new(TrackerConfig::default());
    assert!(machine.stop().is_empty());

    machine.start();
    let version = machine.snapshot().version;
    assert!(machine.start().is_empty());
    assert_eq!(machine.snapshot().version, version);
}

#[test]
fn test_stop_cancels_every_registration() {
    let mut machine = stationary();
    let directives = machine.stop();

    assert!(!machine.is_running());
    assert_eq!(
        directives,
        vec![
            Directive::CancelSamples,
            Directive::CancelStationaryTimeout,
            Directive::CancelPolling,
            Directive::CancelRegionWatch,
        ]
    );
    let snapshot = machine.snapshot();
    assert!(snapshot.stationary_fix.is_none());
    assert!(snapshot.polling.is_none());
    assert!(snapshot.acquisition.is_none());
}

#[test]
fn test_first_sample_commits_stationary_fix() {
    let mut machine = started();
    let fix_sample = sample(20.0, 0.0);
    let directives = effects(machine.on_sample(fix_sample, t0()));

    let fix = StationaryFix {
        location: fix_sample,
        radius: 50.0,
    };
    assert_eq!(machine.state(), Some(TrackingState::Stationary));
    assert_eq!(
        directives,
        vec![
            Directive::CancelSamples,
            Directive::CancelStationaryTimeout,
            Directive::WatchRegion {
                center: fix_sample,
                radius_m: 50.0,
            },
            Directive::ArmPolling {
                first_delay: Duration::from_secs(60),
                interval: Duration::from_secs(300),
            },
            Directive::EmitStationary(fix),
        ]
    );

    let snapshot = machine.snapshot();
    assert_eq!(snapshot.stationary_fix, Some(fix));
    assert_eq!(snapshot.last_stationary_update, Some(t0()));
    assert_eq!(snapshot.polling.map(|p| p.mode), Some(PollingMode::Lazy));
    assert!(snapshot.acquisition.is_none());
}

#[test]
fn test_stationary_radius_grows_with_poor_accuracy() {
    let mut machine = started();
    machine.on_sample(sample(80.0, 0.0), t0());

    let fix = machine.snapshot().stationary_fix.unwrap();
    assert!((fix.radius - 80.0).abs() < f64::EPSILON);
}

#[test]
fn test_region_exit_starts_speed_acquisition() {
    let mut machine = stationary();
    let directives = machine.on_region(RegionTransition::Exited);

    assert_eq!(machine.state(), Some(TrackingState::AcquiringSpeed));
    assert_eq!(cues(&directives), vec![DebugCue::BeepBeepBeep]);
    assert_eq!(
        effects(directives),
        vec![
            Directive::CancelSamples,
            Directive::CancelPolling,
            Directive::CancelRegionWatch,
            Directive::RequestSamples(SampleRequest::acquisition()),
        ]
    );
    assert!(machine.snapshot().stationary_fix.is_none());
}

#[test]
fn test_repeated_region_exit_is_ignored() {
    let mut machine = stationary();
    machine.on_region(RegionTransition::Exited);
    let version = machine.snapshot().version;

    assert!(machine.on_region(RegionTransition::Exited).is_empty());
    assert_eq!(machine.snapshot().version, version);
    assert_eq!(machine.state(), Some(TrackingState::AcquiringSpeed));
}

#[test]
fn test_speed_acquisition_commits_after_three_samples() {
    let mut machine = stationary();
    machine.on_region(RegionTransition::Exited);

    for step in 0..2 {
        let directives = machine.on_sample(sample_at(f64::from(step) * 100.0, 10.0, 10.0), t0());
        assert!(cues(&directives).contains(&DebugCue::Beep));
        assert!(effects(directives).is_empty());
        assert_eq!(machine.state(), Some(TrackingState::AcquiringSpeed));
    }

    let confirming = sample_at(200.0, 10.0, 10.0);
    let directives = machine.on_sample(confirming, t0());
    assert!(cues(&directives).contains(&DebugCue::DoodlyDoo));

    let config = TrackerConfig::default();
    assert_eq!(machine.state(), Some(TrackingState::Moving));
    assert_eq!(
        effects(directives),
        vec![
            Directive::CancelSamples,
            Directive::RequestSamples(SampleRequest::moving(&config, 600)),
            Directive::ArmStationaryTimeout {
                delay: Duration::from_secs(600),
            },
            Directive::EmitLocation(confirming),
        ]
    );

    let snapshot = machine.snapshot();
    assert_eq!(snapshot.sampling_filter_m, 600);
    assert_eq!(snapshot.last_accepted, Some(confirming));
    assert!(snapshot.acquisition.is_none());
}

#[test]
fn test_moving_request_uses_balanced_priority_and_config_intervals() {
    let machine = moving();
    let request = SampleRequest::moving(machine.config(), machine.snapshot().sampling_filter_m);

    assert_eq!(request.priority, AccuracyPriority::Balanced);
    assert_eq!(request.interval, Duration::from_millis(600_000));
    assert_eq!(request.fastest_interval, Duration::from_millis(120_000));
    assert_eq!(request.min_distance_m, 600);
}

#[test]
fn test_moving_sample_inside_filter_is_discarded() {
    let mut machine = moving();
    let last = machine.snapshot().last_accepted.unwrap();

    let directives = effects(machine.on_sample(sample_at(750.0, 10.0, 10.0), t0()));

    assert!(!directives
        .iter()
        .any(|d| matches!(d, Directive::EmitLocation(_))));
    assert_eq!(machine.snapshot().last_accepted, Some(last));
}

#[test]
fn test_moving_sample_beyond_filter_is_forwarded() {
    let mut machine = moving();
    let far = sample_at(1400.0, 10.0, 10.0);

    let directives = effects(machine.on_sample(far, t0()));

    assert_eq!(
        directives,
        vec![
            Directive::ArmStationaryTimeout {
                delay: Duration::from_secs(600),
            },
            Directive::EmitLocation(far),
        ]
    );
    assert_eq!(machine.snapshot().last_accepted, Some(far));
}

#[test]
fn test_speed_change_resubscribes_with_new_filter() {
    let mut machine = moving();
    let directives = effects(machine.on_sample(sample_at(2000.0, 10.0, 20.0), t0()));

    let config = TrackerConfig::default();
    assert!(directives.contains(&Directive::CancelSamples));
    assert!(directives.contains(&Directive::RequestSamples(SampleRequest::moving(&config, 900))));
    assert_eq!(machine.snapshot().sampling_filter_m, 900);
}

#[test]
fn test_inaccurate_or_slow_samples_do_not_rearm_timeout() {
    let mut machine = moving();

    let inaccurate = effects(machine.on_sample(sample_at(2000.0, 100.0, 10.0), t0()));
    let slow = effects(machine.on_sample(sample_at(3000.0, 10.0, 0.5), t0()));

    for directives in [inaccurate, slow] {
        assert!(!directives
            .iter()
            .any(|d| matches!(d, Directive::ArmStationaryTimeout { .. })));
    }
}

#[test]
fn test_stationary_timeout_returns_to_lazy_track() {
    let mut machine = moving();
    let directives = machine.on_stationary_timeout();

    assert_eq!(machine.state(), Some(TrackingState::AcquiringStationary));
    assert!(directives.contains(&Directive::RequestSamples(SampleRequest::acquisition())));
    assert!(directives.contains(&Directive::CancelStationaryTimeout));
}

#[test]
fn test_stationary_timeout_ignored_outside_moving_track() {
    let mut machine = stationary();
    assert!(machine.on_stationary_timeout().is_empty());
    assert_eq!(machine.state(), Some(TrackingState::Stationary));
}

#[test]
fn test_region_entry_while_moving_returns_to_lazy_track() {
    let mut machine = moving();
    machine.on_region(RegionTransition::Entered);
    assert_eq!(machine.state(), Some(TrackingState::AcquiringStationary));

    let mut machine = stationary();
    assert!(machine.on_region(RegionTransition::Entered).is_empty());
    assert_eq!(machine.state(), Some(TrackingState::Stationary));
}

#[test]
fn test_region_exit_ignored_while_moving() {
    let mut machine = moving();
    assert!(machine.on_region(RegionTransition::Exited).is_empty());
    assert_eq!(machine.state(), Some(TrackingState::Moving));
}

#[test]
fn test_poll_alarm_requests_single_sample_only_when_stationary() {
    let mut machine = stationary();
    let directives = machine.on_poll_alarm(t0());
    assert_eq!(
        directives,
        vec![
            Directive::Cue(DebugCue::Dialtone),
            Directive::RequestSingleSample,
        ]
    );
    assert_eq!(
        machine.snapshot().polling.and_then(|p| p.last_fire_time),
        Some(t0())
    );

    let mut machine = moving();
    assert!(machine.on_poll_alarm(t0()).is_empty());
}

#[test]
fn test_polled_sample_near_boundary_switches_to_aggressive_polling() {
    let config = TrackerConfig {
        aggressive_poll_interval_secs: 60,
        ..TrackerConfig::default()
    };
    let mut machine = MotionStateMachine::new(config);
    machine.start();
    machine.on_sample(sample(20.0, 0.0), t0());

    // |0 - 20 - 20| = 40 m, inside the 50 m radius
    let directives = effects(machine.on_polled_sample(sample(20.0, 0.0), t0()));

    assert_eq!(machine.state(), Some(TrackingState::Stationary));
    assert_eq!(
        directives,
        vec![Directive::ArmPolling {
            first_delay: Duration::from_secs(60),
            interval: Duration::from_secs(60),
        }]
    );
    assert_eq!(
        machine.snapshot().polling.map(|p| p.mode),
        Some(PollingMode::Aggressive)
    );

    // Same pacing again: no re-arm
    assert!(effects(machine.on_polled_sample(sample(20.0, 0.0), t0())).is_empty());
}

#[test]
fn test_huge_update_interval_never_refreshes_fix() {
    let config = TrackerConfig {
        stationary_update_interval_mins: u64::MAX / 30,
        ..TrackerConfig::default()
    };
    let mut machine = MotionStateMachine::new(config);
    machine.start();
    machine.on_sample(sample(20.0, 0.0), t0());
    let later = t0() + TimeDelta::days(365);
    machine.on_poll_alarm(later);

    let directives = machine.on_polled_sample(sample(20.0, 0.0), later);

    assert_eq!(machine.state(), Some(TrackingState::Stationary));
    assert!(!directives
        .iter()
        .any(|directive| matches!(directive, Directive::EmitStationary(_))));
}

#[test]
fn test_polled_sample_outside_radius_exits_stationary() {
    let mut machine = stationary();
    let directives = machine.on_polled_sample(sample_at(500.0, 10.0, 0.0), t0());

    assert!(cues(&directives).contains(&DebugCue::BeepBeepBeep));
    assert_eq!(machine.state(), Some(TrackingState::AcquiringSpeed));
}

#[test]
fn test_polled_sample_refreshes_fix_after_update_interval() {
    let mut machine = stationary();
    let later = t0() + TimeDelta::minutes(61);
    let polled = sample(20.0, 0.0);

    let directives = effects(machine.on_polled_sample(polled, later));

    let refreshed = StationaryFix {
        location: polled,
        radius: 50.0,
    };
    assert!(directives.contains(&Directive::EmitStationary(refreshed)));
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.last_stationary_update, Some(later));
    assert_eq!(snapshot.stationary_fix.map(|fix| fix.radius), Some(50.0));
}

#[test]
fn test_polled_sample_before_update_interval_does_not_refresh() {
    let mut machine = stationary();
    let directives = effects(machine.on_polled_sample(sample(20.0, 0.0), t0() + TimeDelta::minutes(30)));

    assert!(!directives
        .iter()
        .any(|d| matches!(d, Directive::EmitStationary(_))));
    assert_eq!(machine.snapshot().last_stationary_update, Some(t0()));
}

#[test]
fn test_polled_sample_ignored_outside_stationary() {
    let mut machine = moving();
    assert!(machine.on_polled_sample(sample(20.0, 0.0), t0()).is_empty());
}

#[test]
fn test_continuous_sample_while_stationary_has_no_effect() {
    let mut machine = stationary();
    let directives = effects(machine.on_sample(sample_at(2000.0, 10.0, 10.0), t0()));
    assert!(directives.is_empty());
    assert_eq!(machine.state(), Some(TrackingState::Stationary));
}

#[test]
fn test_aggressive_switch_from_lazy_track_acquires_speed() {
    let mut machine = started();
    machine.switch_pace(Pace::Aggressive);

    assert_eq!(machine.state(), Some(TrackingState::AcquiringSpeed));
    assert_eq!(
        machine.snapshot().acquisition.map(|s| s.target),
        Some(AcquisitionTarget::Speed)
    );
}

#[test]
fn test_aggressive_switch_while_moving_keeps_moving() {
    let mut machine = moving();
    let directives = machine.switch_pace(Pace::Aggressive);

    let config = TrackerConfig::default();
    assert_eq!(machine.state(), Some(TrackingState::Moving));
    assert!(machine.snapshot().acquisition.is_none());
    assert!(directives.contains(&Directive::RequestSamples(SampleRequest::moving(&config, 600))));
    assert!(directives.contains(&Directive::ArmStationaryTimeout {
        delay: Duration::from_secs(600),
    }));
}

#[test]
fn test_lazy_switch_discards_speed_acquisition() {
    let mut machine = stationary();
    machine.on_region(RegionTransition::Exited);
    machine.on_sample(sample(10.0, 10.0), t0());

    let directives = machine.switch_pace(Pace::Lazy);

    assert_eq!(machine.state(), Some(TrackingState::AcquiringStationary));
    let session = machine.snapshot().acquisition.unwrap();
    assert_eq!(session.target, AcquisitionTarget::Stationary);
    assert_eq!(session.attempts_made, 0);
    assert!(directives.contains(&Directive::CancelStationaryTimeout));
}

#[test]
fn test_aggressive_switch_ignored_while_stopped() {
    let mut machine = MotionStateMachine::new(TrackerConfig::default());
    assert!(machine.switch_pace(Pace::Aggressive).is_empty());
    assert!(!machine.is_running());
}

#[test]
fn test_lazy_switch_starts_stopped_tracker() {
    let mut machine = MotionStateMachine::new(TrackerConfig::default());
    let directives = machine.switch_pace(Pace::Lazy);

    assert_eq!(machine.state(), Some(TrackingState::AcquiringStationary));
    assert!(directives.contains(&Directive::RequestSamples(SampleRequest::acquisition())));
}

#[test]
fn test_invalid_sample_is_discarded_silently() {
    let mut machine = started();
    let version = machine.snapshot().version;

    let mut bad = sample(20.0, 0.0);
    bad.latitude = f64::NAN;
    assert!(machine.on_sample(bad, t0()).is_empty());

    let mut negative = sample(20.0, 0.0);
    negative.accuracy = -1.0;
    assert!(machine.on_sample(negative, t0()).is_empty());

    assert_eq!(machine.state(), Some(TrackingState::AcquiringStationary));
    assert_eq!(machine.snapshot().version, version);
}

#[test]
fn test_configure_rejects_invalid_config() {
    let mut machine = started();
    let invalid = TrackerConfig {
        stationary_radius_m: 0.0,
        ..TrackerConfig::default()
    };

    let result = machine.configure(invalid);

    assert!(matches!(result, Err(TrackingError::Config(_))));
    assert!((machine.config().stationary_radius_m - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_configure_restarts_running_tracker_on_change() {
    let mut machine = moving();
    let config = TrackerConfig {
        distance_filter_m: 100,
        ..TrackerConfig::default()
    };

    let directives = machine.configure(config).unwrap();

    assert_eq!(machine.state(), Some(TrackingState::AcquiringStationary));
    assert_eq!(machine.snapshot().sampling_filter_m, 100);
    assert!(directives.contains(&Directive::RequestSamples(SampleRequest::acquisition())));
}

#[test]
fn test_configure_without_change_is_noop() {
    let mut machine = moving();
    let directives = machine.configure(TrackerConfig::default()).unwrap();
    assert!(directives.is_empty());
    assert_eq!(machine.state(), Some(TrackingState::Moving));
}

#[test]
fn test_configure_while_stopped_only_replaces_config() {
    let mut machine = MotionStateMachine::new(TrackerConfig::default());
    let directives = machine
        .configure(TrackerConfig {
            distance_filter_m: 100,
            ..TrackerConfig::default()
        })
        .unwrap();

    assert!(directives.is_empty());
    assert!(!machine.is_running());
    assert_eq!(machine.config().distance_filter_m, 100);
}

#[test]
fn test_version_increases_on_transitions() {
    let mut machine = MotionStateMachine::new(TrackerConfig::default());
    let initial = machine.snapshot().version;
    machine.start();
    let after_start = machine.snapshot().version;
    machine.on_sample(sample(20.0, 0.0), t0());

    assert!(after_start > initial);
    assert!(machine.snapshot().version > after_start);
}
