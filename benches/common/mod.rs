// ABOUTME: Common benchmark utilities and trace fixtures for performance testing
// ABOUTME: Provides deterministic sample traces for Criterion benchmarks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

//! Common benchmark utilities and test fixtures.

pub mod fixtures;
