// ABOUTME: Virtual alarm scheduler keeping pending alarms in due order against the virtual clock
// ABOUTME: Logs every registration and cancellation so tests can assert on timer traffic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use geopace_core::models::{AlarmHandle, AlarmKind};
use geopace_core::{TrackingError, TrackingResult};

use super::clock::{offset, VirtualClock};
use crate::platform::{AlarmScheduler, Clock};

/// Timer traffic seen by the virtual scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmRecord {
    /// A registration was created
    Scheduled {
        /// Issued handle
        handle: AlarmHandle,
        /// Delay until the first firing
        delay: Duration,
        /// Repeat interval, `None` for one-shots
        interval: Option<Duration>,
    },
    /// A registration was cancelled
    Cancelled(AlarmHandle),
}

#[derive(Debug, Clone, Copy)]
struct PendingAlarm {
    handle: AlarmHandle,
    due: DateTime<Utc>,
    interval: Option<Duration>,
}

#[derive(Debug, Default)]
struct AlarmBook {
    next_id: u64,
    pending: Vec<PendingAlarm>,
    records: Vec<AlarmRecord>,
}

/// Alarm scheduler over a [`VirtualClock`]
#[derive(Debug)]
pub struct VirtualAlarmScheduler {
    clock: VirtualClock,
    book: Mutex<AlarmBook>,
    unavailable: AtomicBool,
}

impl VirtualAlarmScheduler {
    /// Empty scheduler reading time from `clock`
    #[must_use]
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            clock,
            book: Mutex::new(AlarmBook::default()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every later registration fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Pending registrations with their next due time, earliest first
    #[must_use]
    pub fn pending(&self) -> Vec<(AlarmHandle, DateTime<Utc>)> {
        let mut pending: Vec<_> = self
            .book()
            .pending
            .iter()
            .map(|alarm| (alarm.handle, alarm.due))
            .collect();
        pending.sort_by_key(|(handle, due)| (*due, handle.id));
        pending
    }

    /// Pending registration of `kind`, if any
    #[must_use]
    pub fn pending_of(&self, kind: AlarmKind) -> Option<(AlarmHandle, DateTime<Utc>)> {
        self.pending()
            .into_iter()
            .find(|(handle, _)| handle.kind == kind)
    }

    /// Everything scheduled or cancelled so far
    #[must_use]
    pub fn records(&self) -> Vec<AlarmRecord> {
        self.book().records.clone()
    }

    /// Remove and return the earliest alarm due at or before `until`
    ///
    /// Repeating alarms are re-queued one interval after their due time.
    pub fn pop_due(&self, until: DateTime<Utc>) -> Option<(AlarmHandle, DateTime<Utc>)> {
        let mut book = self.book();
        let index = book
            .pending
            .iter()
            .enumerate()
            .filter(|(_, alarm)| alarm.due <= until)
            .min_by_key(|(_, alarm)| (alarm.due, alarm.handle.id))
            .map(|(index, _)| index)?;

        let alarm = book.pending[index];
        match alarm.interval.and_then(|interval| offset(alarm.due, interval).ok()) {
            Some(next_due) => book.pending[index].due = next_due,
            None => {
                book.pending.swap_remove(index);
            }
        }
        Some((alarm.handle, alarm.due))
    }

    fn book(&self) -> MutexGuard<'_, AlarmBook> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(
        &self,
        kind: AlarmKind,
        delay: Duration,
        interval: Option<Duration>,
    ) -> TrackingResult<AlarmHandle> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TrackingError::scheduler_unavailable("virtual scheduler disabled"));
        }
        let due = offset(self.clock.now(), delay)?;

        let mut book = self.book();
        book.next_id += 1;
        let handle = AlarmHandle::new(book.next_id, kind);
        book.pending.push(PendingAlarm {
            handle,
            due,
            interval,
        });
        book.records.push(AlarmRecord::Scheduled {
            handle,
            delay,
            interval,
        });
        Ok(handle)
    }
}

impl AlarmScheduler for VirtualAlarmScheduler {
    fn schedule_once(&self, kind: AlarmKind, delay: Duration) -> TrackingResult<AlarmHandle> {
        self.register(kind, delay, None)
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
        self.register(kind, first_delay, Some(interval))
    }

    fn cancel(&self, handle: AlarmHandle) {
        let mut book = self.book();
        book.pending.retain(|alarm| alarm.handle != handle);
        book.records.push(AlarmRecord::Cancelled(handle));
    }
}
