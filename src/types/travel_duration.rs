// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Travel duration type for simulated covering movement.
//!
//! Coverings report no position, so every simulated move is paced by the
//! time the motor needs for a complete 0-100% run. Partial moves take the
//! proportional share of that time.

use std::fmt;
use std::time::Duration;

use crate::error::ValueError;

/// Time in seconds for a complete 0-100% run (1-60).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use covermotion::types::TravelDuration;
///
/// let full = TravelDuration::FULL_TRAVEL_DEFAULT;
/// assert_eq!(full.seconds(), 26);
///
/// // One percent of travel
/// assert_eq!(full.step_interval(), Duration::from_millis(260));
///
/// // Half of the range takes half the time
/// assert_eq!(full.for_steps(50), Duration::from_secs(13));
///
/// assert!(TravelDuration::new(0).is_err());
/// assert!(TravelDuration::new(61).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct TravelDuration(u8);

impl TravelDuration {
    /// Minimum travel duration (1 second).
    pub const MIN: u8 = 1;

    /// Maximum travel duration (60 seconds).
    pub const MAX: u8 = 60;

    /// Default duration of a full open/close run.
    pub const FULL_TRAVEL_DEFAULT: Self = Self(26);

    /// Default duration of a run to the "my" preset.
    pub const MY_POSITION_DEFAULT: Self = Self(12);

    /// Creates a new travel duration.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 60].
    pub fn new(seconds: u8) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&seconds) {
            return Err(ValueError::OutOfRange {
                min: u16::from(Self::MIN),
                max: u16::from(Self::MAX),
                actual: u16::from(seconds),
            });
        }
        Ok(Self(seconds))
    }

    /// Returns the duration in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u8 {
        self.0
    }

    /// Returns the duration of a full run.
    #[must_use]
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.0))
    }

    /// Time spent on a single 1% step.
    #[must_use]
    pub fn step_interval(&self) -> Duration {
        // seconds * 1000 ms / 100 steps
        Duration::from_millis(u64::from(self.0) * 10)
    }

    /// Time needed to cover `steps` percent of travel.
    #[must_use]
    pub fn for_steps(&self, steps: u8) -> Duration {
        self.step_interval() * u32::from(steps)
    }
}

impl Default for TravelDuration {
    fn default() -> Self {
        Self::FULL_TRAVEL_DEFAULT
    }
}

impl fmt::Display for TravelDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl TryFrom<u8> for TravelDuration {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TravelDuration> for u8 {
    fn from(duration: TravelDuration) -> Self {
        duration.0
    }
}
