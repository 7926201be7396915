// ABOUTME: Acquisition protocol that debounces noisy fixes before a state transition commits
// ABOUTME: Counts attempts per session, keeps the best or latest candidate, and enforces caps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use geopace_core::constants::acquisition::{
    MAX_SPEED_ACQUISITION_ATTEMPTS, MAX_STATIONARY_ACQUISITION_ATTEMPTS,
};
use geopace_core::models::{AcquisitionTarget, PositionSample};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of recording one candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttemptOutcome {
    /// More samples are needed; the candidate is not committed
    Pending {
        /// Attempts recorded so far
        attempts_made: u32,
        /// Attempts needed to commit
        attempts_required: u32,
    },
    /// The session is complete; commit with this sample
    Commit(PositionSample),
}

/// One in-flight acquisition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionSession {
    /// State being confirmed
    pub target: AcquisitionTarget,
    /// Attempts recorded so far
    pub attempts_made: u32,
    /// Attempts needed to commit
    pub attempts_required: u32,
    /// Most accurate (stationary) or most recent (speed) candidate
    pub best_candidate: Option<PositionSample>,
}

impl AcquisitionSession {
    /// Session using the standard attempt cap for `target`
    #[must_use]
    pub const fn new(target: AcquisitionTarget) -> Self {
        let attempts_required = match target {
            AcquisitionTarget::Stationary => MAX_STATIONARY_ACQUISITION_ATTEMPTS,
            AcquisitionTarget::Speed => MAX_SPEED_ACQUISITION_ATTEMPTS,
        };
        Self::with_required(target, attempts_required)
    }

    /// Session with an explicit attempt cap (at least one)
    #[must_use]
    pub const fn with_required(target: AcquisitionTarget, attempts_required: u32) -> Self {
        Self {
            target,
            attempts_made: 0,
            attempts_required: if attempts_required == 0 {
                1
            } else {
                attempts_required
            },
            best_candidate: None,
        }
    }

    /// Record one candidate sample
    pub fn record_attempt(&mut self, candidate: PositionSample) -> AttemptOutcome {
        debug_assert!(
            self.attempts_made < self.attempts_required,
            "acquisition session recorded past its cap"
        );
        self.attempts_made += 1;

        match self.target {
            AcquisitionTarget::Stationary => {
                let improves = self
                    .best_candidate
                    .map_or(true, |best| candidate.is_more_accurate_than(&best));
                if improves {
                    self.best_candidate = Some(candidate);
                }
            }
            AcquisitionTarget::Speed => self.best_candidate = Some(candidate),
        }

        if self.attempts_made >= self.attempts_required {
            AttemptOutcome::Commit(self.best_candidate.unwrap_or(candidate))
        } else {
            AttemptOutcome::Pending {
                attempts_made: self.attempts_made,
                attempts_required: self.attempts_required,
            }
        }
    }
}

/// Owns at most one acquisition session at a time
#[derive(Debug, Clone, Default)]
pub struct AcquisitionController {
    session: Option<AcquisitionSession>,
}

impl AcquisitionController {
    /// Controller with no active session
    #[must_use]
    pub const fn new() -> Self {
        Self { session: None }
    }

    /// Start a fresh session, discarding any partial progress
    pub fn begin(&mut self, target: AcquisitionTarget) {
        if let Some(previous) = self.session.take() {
            debug!(
                previous = ?previous.target,
                attempts = previous.attempts_made,
                "Discarding in-flight acquisition session"
            );
        }
        self.session = Some(AcquisitionSession::new(target));
    }

    /// Drop the active session, if any
    pub fn reset(&mut self) {
        self.session = None;
    }

    /// Active session
    #[must_use]
    pub const fn session(&self) -> Option<&AcquisitionSession> {
        self.session.as_ref()
    }

    /// Target of the active session
    #[must_use]
    pub fn target(&self) -> Option<AcquisitionTarget> {
        self.session.map(|session| session.target)
    }

    /// Record a candidate against the active session
    ///
    /// Returns `None` when no session is active. A commit destroys the session.
    pub fn record_attempt(&mut self, candidate: PositionSample) -> Option<AttemptOutcome> {
        let session = self.session.as_mut()?;
        let outcome = session.record_attempt(candidate);
        if matches!(outcome, AttemptOutcome::Commit(_)) {
            self.session = None;
        }
        Some(outcome)
    }
}
