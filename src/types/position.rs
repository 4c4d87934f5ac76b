// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Position type for window coverings.
//!
//! This module provides a type-safe representation of a covering position,
//! ensuring values are always within the valid range of 0-100%.

use std::fmt;

use crate::error::ValueError;

/// Covering position as a percentage (0-100).
///
/// 0 is fully closed and 100 is fully open, matching the window covering
/// convention used by home automation bridges.
///
/// # Examples
///
/// ```
/// use covermotion::types::Position;
///
/// let half = Position::new(50).unwrap();
/// assert_eq!(half.value(), 50);
///
/// assert!(Position::OPEN.is_fully_open());
/// assert!(Position::CLOSED.is_fully_closed());
///
/// // Invalid values return error
/// assert!(Position::new(101).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Position(u8);

impl Position {
    /// Fully closed (0%).
    pub const CLOSED: Self = Self(0);

    /// Fully open (100%).
    pub const OPEN: Self = Self(100);

    /// Creates a new position.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a position, clamping to the valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use covermotion::types::Position;
    ///
    /// assert_eq!(Position::clamped(150), Position::OPEN);
    /// ```
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns true at 100%.
    #[must_use]
    pub const fn is_fully_open(&self) -> bool {
        self.0 == 100
    }

    /// Returns true at 0%.
    #[must_use]
    pub const fn is_fully_closed(&self) -> bool {
        self.0 == 0
    }

    /// Number of 1% steps between two positions.
    #[must_use]
    pub const fn distance(&self, other: Self) -> u8 {
        self.0.abs_diff(other.0)
    }

    /// Moves one percent toward `target`, or stays put if already there.
    ///
    /// # Examples
    ///
    /// ```
    /// use covermotion::types::Position;
    ///
    /// let p = Position::new(40).unwrap();
    /// assert_eq!(p.step_toward(Position::OPEN).value(), 41);
    /// assert_eq!(p.step_toward(Position::CLOSED).value(), 39);
    /// assert_eq!(p.step_toward(p), p);
    /// ```
    #[must_use]
    pub const fn step_toward(self, target: Self) -> Self {
        if target.0 > self.0 {
            Self(self.0 + 1)
        } else if target.0 < self.0 {
            Self(self.0 - 1)
        } else {
            self
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Position {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Position> for u8 {
    fn from(position: Position) -> Self {
        position.0
    }
}
