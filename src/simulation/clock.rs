// ABOUTME: Virtual clock that only advances when the simulation moves time forward
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use geopace_core::{TrackingError, TrackingResult};

use crate::platform::Clock;

/// Shared, manually advanced clock
#[derive(Debug, Clone)]
pub struct VirtualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl VirtualClock {
    /// Clock frozen at `start`
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Jump to `instant`; moving backwards is ignored
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        if instant > *now {
            *now = instant;
        }
    }

    /// Move forward by `by`
    ///
    /// # Errors
    ///
    /// Returns an error if the result is out of the representable range
    pub fn advance(&self, by: Duration) -> TrackingResult<DateTime<Utc>> {
        let target = offset(self.now(), by)?;
        self.set(target);
        Ok(target)
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `at + by` with range checking
pub(crate) fn offset(at: DateTime<Utc>, by: Duration) -> TrackingResult<DateTime<Utc>> {
    TimeDelta::from_std(by)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .ok_or_else(|| {
            TrackingError::scheduler_unavailable(format!("time offset {by:?} out of range"))
        })
}
