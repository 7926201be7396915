// ABOUTME: Core types and constants for the geopace motion-state scheduler
// ABOUTME: Foundation crate with error handling, domain models, configuration and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

#![deny(unsafe_code)]

//! # Geopace Core
//!
//! Foundation crate providing the shared vocabulary of the geopace tracker:
//! position samples, tracking states, alarm handles, events and the
//! configuration snapshot. It carries no behaviour beyond validation and
//! small geometric helpers, so the scheduler crate can change freely on top.
//!
//! ## Modules
//!
//! - **errors**: `TrackingError`, `ConfigError` and stable `ErrorCode`s
//! - **constants**: acquisition caps, timer intervals, environment keys
//! - **models**: samples, fixes, states, events and collaborator requests
//! - **config**: `TrackerConfig`, the read-only configuration snapshot

/// Unified error handling with stable error codes
pub mod errors;

/// Tracker constants organized by concern
pub mod constants;

/// Core data models (samples, fixes, states, events)
pub mod models;

/// Tracker configuration snapshot and validation
pub mod config;

pub use config::TrackerConfig;
pub use errors::{ConfigError, ErrorCode, TrackingError, TrackingResult};
