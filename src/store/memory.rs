// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory position store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::StoreError;

use super::{PositionStore, StoreKey};

/// Process-local [`PositionStore`].
///
/// Clones share the same underlying map, so a test can keep a handle and
/// inspect what the controller wrote.
///
/// # Examples
///
/// ```
/// use covermotion::store::{MemoryStore, PositionStore, StoreKey};
///
/// let store = MemoryStore::new();
/// assert_eq!(store.get("kitchen", StoreKey::CurrentPosition, 100), 100);
///
/// store.set("kitchen", StoreKey::CurrentPosition, 40).unwrap();
/// assert_eq!(store.get("kitchen", StoreKey::CurrentPosition, 100), 40);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<(String, StoreKey), u8>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail (or succeed again).
    ///
    /// Reads keep working, mirroring a medium that turned read-only.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    /// Returns true if nothing was stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl PositionStore for MemoryStore {
    fn read(&self, namespace: &str, key: StoreKey) -> Result<Option<u8>, StoreError> {
        Ok(self
            .values
            .lock()
            .get(&(namespace.to_string(), key))
            .copied())
    }

    fn set(&self, namespace: &str, key: StoreKey, value: u8) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        self.values.lock().insert((namespace.to_string(), key), value);
        Ok(())
    }
}
