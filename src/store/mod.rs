// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Durable storage for covering positions and durations.
//!
//! The store is a small key/value medium namespaced per covering. It is read
//! once when a covering is added and written on every observed change. The
//! in-memory [`CoveringState`](crate::state::CoveringState) remains
//! authoritative for the running process, so write failures are logged and
//! otherwise ignored by the controller.
//!
//! # Implementations
//!
//! - [`MemoryStore`]: process-local map, useful for tests and ephemeral setups
//! - [`JsonFileStore`]: one JSON document per covering (feature `file-store`)

#[cfg(feature = "file-store")]
mod json_file;
mod memory;
mod writer;

#[cfg(feature = "file-store")]
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub(crate) use writer::StoreWriter;

use std::fmt;

use crate::error::StoreError;

/// Keys persisted for each covering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    /// Last simulated position.
    CurrentPosition,
    /// Last commanded destination.
    TargetPosition,
    /// Seconds for a full run.
    FullTravelDuration,
    /// Seconds for a run to the "my" preset.
    MyPositionDuration,
}

impl StoreKey {
    /// All keys, in storage order.
    pub const ALL: [Self; 4] = [
        Self::CurrentPosition,
        Self::TargetPosition,
        Self::FullTravelDuration,
        Self::MyPositionDuration,
    ];

    /// Returns the key name used on the storage medium.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentPosition => "currentPosition",
            Self::TargetPosition => "targetPosition",
            Self::FullTravelDuration => "fullTravelDuration",
            Self::MyPositionDuration => "myPositionDuration",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A durable key/value holder namespaced per covering.
///
/// Implementations must be cheap enough to call on every simulated step
/// (one write per 1% of travel).
pub trait PositionStore: Send + Sync + fmt::Debug {
    /// Reads a value.
    ///
    /// Returns `Ok(None)` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the medium cannot be read.
    fn read(&self, namespace: &str, key: StoreKey) -> Result<Option<u8>, StoreError>;

    /// Writes a value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the medium cannot be written.
    fn set(&self, namespace: &str, key: StoreKey, value: u8) -> Result<(), StoreError>;

    /// Reads a value, falling back to `default`.
    ///
    /// Never fails: read errors are logged and yield `default`.
    fn get(&self, namespace: &str, key: StoreKey, default: u8) -> u8 {
        match self.read(namespace, key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(namespace, key = %key, error = %e, "Failed to read store, using default");
                default
            }
        }
    }
}
