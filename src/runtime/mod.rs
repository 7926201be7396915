// ABOUTME: Tokio runtime adapters: tracker actor, alarm timers, broadcast sink and system clock
// ABOUTME: Wires the pure tracker to real time and async channels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! # Runtime
//!
//! Production wiring for the tracker on a tokio runtime. The tracker itself
//! stays single-threaded: [`TrackerService`] owns it on one task and every
//! collaborator answer, alarm and command reaches it through the same
//! [`EventSender`] queue.

/// Tokio-backed alarm scheduler
pub mod alarms;
/// Wall clock
pub mod clock;
/// Collaborators that only log requests, for externally fed samples
pub mod passive;
/// Tracker actor and its handle
pub mod service;
/// Broadcast output sink and tracing debug feedback
pub mod sink;

pub use alarms::TokioAlarmScheduler;
pub use clock::SystemClock;
pub use passive::{PassivePositionSource, PassiveRegionWatcher};
pub use service::{event_channel, EventSender, TrackerHandle, TrackerService};
pub use sink::{BroadcastSink, TracingFeedback};
