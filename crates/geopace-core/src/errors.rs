// ABOUTME: Error types for the tracker core and its collaborator contracts
// ABOUTME: Defines TrackingError, ConfigError and stable numeric error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! # Tracking Error Types
//!
//! Errors fall into three groups:
//! - requests rejected by an external collaborator (`AuthorizationDenied`,
//!   `SchedulerUnavailable`), which halt tracking until re-enabled
//! - malformed input (`InvalidSample`), which is discarded silently
//! - plumbing failures (`ChannelClosed`, `Config`)
//!
//! Redundant operations (stopping a stopped tracker, starting a started one)
//! are not errors and never reach this module.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use thiserror::Error;

/// Stable error codes used in logs and in the sink's error channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authorization (1000-1999)
    #[serde(rename = "AUTHORIZATION_DENIED")]
    AuthorizationDenied = 1000,

    // Input validation (3000-3999)
    #[serde(rename = "INVALID_SAMPLE")]
    InvalidSample = 3000,

    // Runtime plumbing (5000-5999)
    #[serde(rename = "SCHEDULER_UNAVAILABLE")]
    SchedulerUnavailable = 5000,
    #[serde(rename = "CHANNEL_CLOSED")]
    ChannelClosed = 5001,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6000,
}

impl ErrorCode {
    /// Human readable description of the code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthorizationDenied => "A location, region or alarm request was rejected",
            Self::InvalidSample => "A position sample was malformed and discarded",
            Self::SchedulerUnavailable => "The timer scheduler could not arm an alarm",
            Self::ChannelClosed => "The tracker event queue is closed",
            Self::ConfigInvalid => "The tracker configuration is invalid",
        }
    }

    /// Whether this error halts tracking until a command re-enables it
    #[must_use]
    pub const fn halts_tracking(self) -> bool {
        matches!(self, Self::AuthorizationDenied | Self::SchedulerUnavailable)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), *self as u16)
    }
}

/// Configuration-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Value outside acceptable range
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),

    /// Failed to parse configuration value
    #[error("Parse error: {0}")]
    Parse(String),

    /// Environment variable access error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] env::VarError),
}

/// Errors surfaced by the tracker and its collaborators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackingError {
    /// A sample subscription, region watch or alarm request was rejected
    #[error("Authorization denied for {operation}")]
    AuthorizationDenied {
        /// Collaborator operation that was rejected
        operation: String,
    },

    /// A position sample failed validation
    #[error("Invalid sample: {reason}")]
    InvalidSample {
        /// Which field was malformed
        reason: String,
    },

    /// The alarm scheduler could not arm a timer
    #[error("Scheduler unavailable: {reason}")]
    SchedulerUnavailable {
        /// Why the timer could not be armed
        reason: String,
    },

    /// The tracker event queue has been closed
    #[error("Tracker event channel closed")]
    ChannelClosed,

    /// Configuration could not be loaded or validated
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TrackingError {
    /// Create an "authorization denied" error
    #[must_use]
    pub fn authorization_denied(operation: impl Into<String>) -> Self {
        Self::AuthorizationDenied {
            operation: operation.into(),
        }
    }

    /// Create an "invalid sample" error
    #[must_use]
    pub fn invalid_sample(reason: impl Into<String>) -> Self {
        Self::InvalidSample {
            reason: reason.into(),
        }
    }

    /// Create a "scheduler unavailable" error
    #[must_use]
    pub fn scheduler_unavailable(reason: impl Into<String>) -> Self {
        Self::SchedulerUnavailable {
            reason: reason.into(),
        }
    }

    /// Stable code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::AuthorizationDenied { .. } => ErrorCode::AuthorizationDenied,
            Self::InvalidSample { .. } => ErrorCode::InvalidSample,
            Self::SchedulerUnavailable { .. } => ErrorCode::SchedulerUnavailable,
            Self::ChannelClosed => ErrorCode::ChannelClosed,
            Self::Config(_) => ErrorCode::ConfigInvalid,
        }
    }
}

/// Result alias used throughout the tracker
pub type TrackingResult<T> = Result<T, TrackingError>;
