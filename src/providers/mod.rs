// ABOUTME: Credential provider and telemetry source abstractions plus clients
// ABOUTME: Core traits, the Google Fit REST client, and the file-backed token store
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry providers.
//!
//! The rest of the system only sees two traits: [`CredentialProvider`] hands
//! out a usable access credential, and [`TelemetrySource`] fetches one
//! metric's raw samples for a time range. The concrete implementations talk
//! to the Google Fit REST API with a file-backed OAuth token store.

/// Core provider traits and shared types
pub mod core;

/// Google Fit REST telemetry client
pub mod google_fit;

/// File-backed OAuth token store with refresh support
pub mod token_store;

pub use self::core::{
    Credential, CredentialProvider, ProviderError, ProviderResult, TelemetrySource, TimeRange,
};
pub use google_fit::GoogleFitClient;
pub use token_store::FileCredentialProvider;
