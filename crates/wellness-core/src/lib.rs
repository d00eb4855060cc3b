// ABOUTME: Core domain types and constants for the wellness dashboard platform
// ABOUTME: Foundation crate with raw samples, daily records, goals, and predictions
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Wellness Core
//!
//! Foundation crate providing the shared domain model for the wellness
//! dashboard. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **models**: Raw telemetry samples, daily records, goals, and predictions
//! - **constants**: Defaults and tunable thresholds organized by concern

/// Defaults and tunable thresholds organized by concern
pub mod constants;

/// Raw telemetry samples, daily records, goals, and predictions
pub mod models;

pub use models::{
    DailyRecord, Goals, MetricKind, Prediction, RawSample, SampleValue, WellnessCategory,
};
