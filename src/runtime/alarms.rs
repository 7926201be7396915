// ABOUTME: Alarm scheduler backed by tokio timers that posts AlarmFired events to the tracker queue
// ABOUTME: Tracks one task per registration in a DashMap so cancellation aborts the timer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use geopace_core::models::{AlarmHandle, AlarmKind, TrackerEvent};
use geopace_core::{TrackingError, TrackingResult};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use super::service::EventSender;
use crate::platform::AlarmScheduler;

/// Tokio timer tasks keyed by registration id
#[derive(Debug)]
pub struct TokioAlarmScheduler {
    events: EventSender,
    tasks: Arc<DashMap<u64, JoinHandle<()>>>,
    next_id: AtomicU64,
}

impl TokioAlarmScheduler {
    /// Scheduler posting into `events`
    #[must_use]
    pub fn new(events: EventSender) -> Self {
        Self {
            events,
            tasks: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registrations that have not fired or been cancelled
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    fn runtime() -> TrackingResult<Handle> {
        Handle::try_current().map_err(|e| TrackingError::scheduler_unavailable(e.to_string()))
    }

    fn next_handle(&self, kind: AlarmKind) -> AlarmHandle {
        AlarmHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed), kind)
    }

    fn track(&self, handle: AlarmHandle, task: JoinHandle<()>) {
        self.tasks.retain(|_, task| !task.is_finished());
        self.tasks.insert(handle.id, task);
        debug!(alarm = %handle.kind, id = handle.id, "Alarm armed");
    }
}

impl AlarmScheduler for TokioAlarmScheduler {
    fn schedule_once(&self, kind: AlarmKind, delay: Duration) -> TrackingResult<AlarmHandle> {
        let runtime = Self::runtime()?;
        let handle = self.next_handle(kind);
        let events = self.events.clone();
        let tasks = Arc::clone(&self.tasks);

        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            tasks.remove(&handle.id);
            if events.post(TrackerEvent::alarm(handle)).await.is_err() {
                debug!(alarm = %handle.kind, "Tracker gone, dropping alarm");
            }
        });
        self.track(handle, task);
        Ok(handle)
    }

    fn schedule_repeating(
        &self,
        kind: AlarmKind,
        first_delay: Duration,
        interval: Duration,
    ) -> TrackingResult<AlarmHandle> {
        if interval.is_zero() {
            return Err(TrackingError::scheduler_unavailable(
                "repeating alarm needs a non-zero interval",
            ));
        }
        let runtime = Self::runtime()?;
        let handle = self.next_handle(kind);
        let events = self.events.clone();

        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + first_delay, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if events.post(TrackerEvent::alarm(handle)).await.is_err() {
                    debug!(alarm = %handle.kind, "Tracker gone, stopping repeating alarm");
                    break;
                }
            }
        });
        self.track(handle, task);
        Ok(handle)
    }

    fn cancel(&self, handle: AlarmHandle) {
        if let Some((_, task)) = self.tasks.remove(&handle.id) {
            task.abort();
            debug!(alarm = %handle.kind, id = handle.id, "Alarm cancelled");
        }
    }
}

impl Drop for TokioAlarmScheduler {
    fn drop(&mut self) {
        for entry in self.tasks.iter() {
            entry.value().abort();
        }
    }
}
