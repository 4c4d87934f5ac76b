// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are the building blocks for updating a
//! [`CoveringState`](super::CoveringState). The simulator produces one
//! [`StateChange::CurrentPosition`] per simulated step, and requests produce
//! target, motion and configuration changes.
//!
//! # Examples
//!
//! ```
//! use covermotion::state::{CoveringState, StateChange};
//! use covermotion::types::Position;
//!
//! let mut state = CoveringState::new(Position::OPEN);
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::CurrentPosition(Position::CLOSED)));
//! assert!(!state.apply(&StateChange::CurrentPosition(Position::CLOSED)));
//! ```

use crate::types::{MotionState, Position, TravelDuration};

/// Represents a change in covering state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// The simulated position moved.
    CurrentPosition(Position),

    /// A new destination was commanded.
    TargetPosition(Position),

    /// Motion started or stopped.
    Motion(MotionState),

    /// The full travel duration was reconfigured.
    FullTravelDuration(TravelDuration),

    /// The "my" preset duration was reconfigured.
    MyPositionDuration(TravelDuration),
}

impl StateChange {
    /// Returns the new position if this is a position update.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::CurrentPosition(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns true if this change affects persisted data.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        !matches!(self, Self::Motion(_))
    }
}
