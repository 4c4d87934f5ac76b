// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Covering event types.

use crate::state::{CoveringState, StateChange};
use crate::types::Position;

use super::CoveringId;

/// Events emitted by the position controller.
///
/// Every simulated step produces a [`StateChanged`](Self::StateChanged)
/// event carrying a [`StateChange::CurrentPosition`]; subscribers persist or
/// publish it as they see fit.
///
/// # Examples
///
/// ```
/// use covermotion::event::{CoveringEvent, CoveringId};
/// use covermotion::state::{CoveringState, StateChange};
/// use covermotion::types::Position;
///
/// let covering_id = CoveringId::new();
/// let event = CoveringEvent::state_changed(
///     covering_id,
///     StateChange::CurrentPosition(Position::CLOSED),
///     CoveringState::new(Position::CLOSED),
/// );
/// assert_eq!(event.position(), Some(Position::CLOSED));
/// ```
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum CoveringEvent {
    /// A covering was added to the controller.
    CoveringAdded {
        /// The ID of the added covering.
        covering_id: CoveringId,
        /// State restored from the store.
        state: CoveringState,
    },

    /// A covering was removed from the controller.
    CoveringRemoved {
        /// The ID of the removed covering.
        covering_id: CoveringId,
    },

    /// Covering state changed.
    StateChanged {
        /// The ID of the covering.
        covering_id: CoveringId,
        /// The specific change that occurred.
        change: StateChange,
        /// The complete new state of the covering.
        new_state: CoveringState,
    },

    /// A motion episode reached its target.
    Arrived {
        /// The ID of the covering.
        covering_id: CoveringId,
        /// The final position.
        position: Position,
    },

    /// A motor command could not be delivered.
    CommandFailed {
        /// The ID of the covering.
        covering_id: CoveringId,
        /// The command name that failed.
        command: String,
        /// Description of the failure.
        error: String,
    },
}

impl CoveringEvent {
    /// Returns the covering ID associated with this event.
    #[must_use]
    pub fn covering_id(&self) -> CoveringId {
        match self {
            Self::CoveringAdded { covering_id, .. }
            | Self::CoveringRemoved { covering_id }
            | Self::StateChanged { covering_id, .. }
            | Self::Arrived { covering_id, .. }
            | Self::CommandFailed { covering_id, .. } => *covering_id,
        }
    }

    /// Returns the new position if this event reports a position change.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::StateChanged { change, .. } => change.position(),
            _ => None,
        }
    }

    /// Returns `true` if this is a lifecycle event (added/removed).
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::CoveringAdded { .. } | Self::CoveringRemoved { .. })
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(
        covering_id: CoveringId,
        change: StateChange,
        new_state: CoveringState,
    ) -> Self {
        Self::StateChanged {
            covering_id,
            change,
            new_state,
        }
    }
}
