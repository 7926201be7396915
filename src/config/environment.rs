// ABOUTME: Environment configuration for the tracker: interval, filter, radius and polling settings
// ABOUTME: Falls back to defaults for unset variables and rejects malformed values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! Environment-based tracker configuration

use std::env;
use std::str::FromStr;

use geopace_core::constants::env_config;
use geopace_core::{ConfigError, TrackerConfig};
use tracing::{debug, info};

/// Build a validated [`TrackerConfig`] from `GEOPACE_*` variables
///
/// Unset variables keep their default value.
///
/// # Errors
///
/// Returns `ConfigError::Parse` if a variable is set to a malformed value, or
/// `ConfigError::ValueOutOfRange` if the resulting configuration is invalid
pub fn tracker_config_from_env() -> Result<TrackerConfig, ConfigError> {
    let mut config = TrackerConfig::default();

    parse_env(env_config::INTERVAL_MS, &mut config.interval_ms)?;
    parse_env(env_config::FASTEST_INTERVAL_MS, &mut config.fastest_interval_ms)?;
    parse_env(env_config::DISTANCE_FILTER_M, &mut config.distance_filter_m)?;
    parse_env(env_config::STATIONARY_RADIUS_M, &mut config.stationary_radius_m)?;
    parse_env(
        env_config::STATIONARY_UPDATE_INTERVAL_MINS,
        &mut config.stationary_update_interval_mins,
    )?;
    parse_env(env_config::DESIRED_ACCURACY_M, &mut config.desired_accuracy_m)?;
    parse_env(
        env_config::LAZY_POLL_INTERVAL_SECS,
        &mut config.lazy_poll_interval_secs,
    )?;
    parse_env(
        env_config::AGGRESSIVE_POLL_INTERVAL_SECS,
        &mut config.aggressive_poll_interval_secs,
    )?;
    if let Some(value) = env_value(env_config::DEBUG)? {
        config.debug = parse_bool(env_config::DEBUG, &value)?;
    }

    config.validate()?;
    info!(
        distance_filter_m = config.distance_filter_m,
        stationary_radius_m = config.stationary_radius_m,
        interval_ms = config.interval_ms,
        debug = config.debug,
        "Tracker configuration loaded"
    );
    Ok(config)
}

/// Parse environment variable into `target` if set
fn parse_env<T>(key: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = env_value(key)? {
        *target = value
            .trim()
            .parse()
            .map_err(|e| ConfigError::Parse(format!("{key}={value}: {e}")))?;
        debug!(key, value = %value, "Configuration override");
    }
    Ok(())
}

/// Accepts true/false, 1/0, yes/no, on/off
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Parse(format!("{key}={other}: expected a boolean"))),
    }
}

/// Unset and empty variables read as absent
fn env_value(key: &str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar(e)),
    }
}
