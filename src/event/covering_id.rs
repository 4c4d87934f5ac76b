// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Covering identifier type.

use std::fmt;

use uuid::Uuid;

/// Namespace for identifiers derived from device URLs.
const COVERING_NAMESPACE: Uuid = Uuid::from_u128(0x4f6b_9800_0723_412f_8567_6786_05a2_9f52);

/// Unique identifier for a managed covering.
///
/// Identifiers derived with [`from_device_url`](Self::from_device_url) are
/// stable across restarts, which makes them usable as the persistence
/// namespace of a covering.
///
/// # Examples
///
/// ```
/// use covermotion::event::CoveringId;
///
/// let a = CoveringId::from_device_url("rts://1234-5678-9012/16756006");
/// let b = CoveringId::from_device_url("rts://1234-5678-9012/16756006");
/// assert_eq!(a, b);
///
/// assert_ne!(CoveringId::new(), CoveringId::new());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct CoveringId(Uuid);

impl CoveringId {
    /// Creates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives a deterministic identifier from a device URL.
    #[must_use]
    pub fn from_device_url(device_url: &str) -> Self {
        Self(Uuid::new_v5(&COVERING_NAMESPACE, device_url.as_bytes()))
    }

    /// Creates an identifier from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CoveringId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CoveringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 characters are enough to tell coverings apart in logs
        let short = &self.0.to_string()[..8];
        write!(f, "CoveringId({short}...)")
    }
}

impl fmt::Display for CoveringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CoveringId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
