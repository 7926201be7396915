// ABOUTME: Configuration module loading the tracker configuration snapshot
// ABOUTME: Reads GEOPACE_* environment variables on top of the built-in defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! Configuration module for the geopace tracker
//!
//! - **Environment**: `TrackerConfig` from `GEOPACE_*` variables

/// Environment-based tracker configuration
pub mod environment;

pub use environment::tracker_config_from_env;
pub use geopace_core::config::TrackerConfig;
