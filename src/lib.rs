// ABOUTME: Main library entry point for the wellness dashboard server
// ABOUTME: Wires configuration, providers, sessions, and REST routes together
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Wellness Dashboard
//!
//! A small personal-project web service that authenticates against a
//! fitness-tracking cloud API, aggregates raw telemetry into daily wellness
//! summaries, runs pre-trained models over them, mines goal-achievement
//! patterns, and serves everything as chart-ready JSON.
//!
//! ## Architecture
//!
//! - **providers**: credential handling and the telemetry source client
//! - **routes**: REST endpoints consumed by the dashboard frontend
//! - **session**: per-session goals, records, predictions, and insights
//! - **context**: read-only resources shared across requests
//! - **config**: environment-variable configuration
//!
//! The analytical pipeline itself lives in the `wellness-intelligence`
//! workspace crate; domain types live in `wellness-core`.

/// Environment-variable server configuration
pub mod config;

/// Read-only resources shared across request handlers
pub mod context;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// Credential provider and telemetry source clients
pub mod providers;

/// REST routes for the dashboard frontend
pub mod routes;

/// Per-session state store
pub mod session;
