// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `covermotion` library.
//!
//! This module provides the error hierarchy for the failures the library can
//! observe: value validation, covering configuration, position persistence,
//! and motor command delivery.
//!
//! None of these errors is fatal to a running simulation. Persistence and
//! command failures are logged and the in-memory state stays authoritative.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The covering configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error occurred while reading or writing the position store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Error occurred while delivering a motor command.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Covering was not found in the controller.
    #[error("covering not found")]
    CoveringNotFound,

    /// A covering with the same device URL is already registered.
    #[error("covering already registered")]
    CoveringExists,
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },
}

/// Errors raised while loading or validating a covering configuration.
///
/// Configuration is validated when a covering is added, never while an
/// episode is running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A travel duration is zero or above the supported maximum.
    #[error("invalid {field}: {source}")]
    InvalidTravelDuration {
        /// The configuration field holding the duration.
        field: &'static str,
        /// The underlying range violation.
        source: ValueError,
    },

    /// A persisted position is outside [0, 100].
    #[error("invalid persisted {field}: {source}")]
    InvalidPosition {
        /// The store key holding the position.
        field: &'static str,
        /// The underlying range violation.
        source: ValueError,
    },
}

/// Errors related to the position store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying medium failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be encoded or decoded.
    #[cfg(feature = "file-store")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store cannot currently accept writes.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors related to motor command delivery.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The device layer rejected the command.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// The command sink did not answer in time.
    #[error("command timed out after {0} ms")]
    Timeout(u64),

    /// The transport towards the device failed.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The dispatcher queue was closed.
    #[error("command channel closed")]
    ChannelClosed,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
