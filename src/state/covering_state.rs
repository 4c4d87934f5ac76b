// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Covering state tracking.

use crate::types::{MotionState, Position, TravelDuration};

use super::StateChange;

/// The in-memory record of a single covering.
///
/// This is the authoritative state for the running process. The position
/// store only mirrors it so a restart can resume from the last known
/// position.
///
/// # Examples
///
/// ```
/// use covermotion::state::CoveringState;
/// use covermotion::types::{MotionState, Position};
///
/// let state = CoveringState::new(Position::OPEN);
/// assert_eq!(state.current_position(), Position::OPEN);
/// assert_eq!(state.target_position(), Position::OPEN);
/// assert_eq!(state.motion_state(), MotionState::Stopped);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CoveringState {
    current_position: Position,
    target_position: Position,
    motion_state: MotionState,
    full_travel_duration: TravelDuration,
    my_position_duration: TravelDuration,
}

impl CoveringState {
    /// Creates a stopped covering at `position` with default durations.
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self {
            current_position: position,
            target_position: position,
            motion_state: MotionState::Stopped,
            full_travel_duration: TravelDuration::FULL_TRAVEL_DEFAULT,
            my_position_duration: TravelDuration::MY_POSITION_DEFAULT,
        }
    }

    /// Sets both travel durations.
    #[must_use]
    pub fn with_durations(mut self, full_travel: TravelDuration, my_position: TravelDuration) -> Self {
        self.full_travel_duration = full_travel;
        self.my_position_duration = my_position;
        self
    }

    /// Returns the last simulated position.
    #[must_use]
    pub fn current_position(&self) -> Position {
        self.current_position
    }

    /// Returns the last commanded destination.
    #[must_use]
    pub fn target_position(&self) -> Position {
        self.target_position
    }

    /// Returns the motion state.
    #[must_use]
    pub fn motion_state(&self) -> MotionState {
        self.motion_state
    }

    /// Returns true while an episode is running.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.motion_state.is_moving()
    }

    /// Returns the configured full travel duration.
    #[must_use]
    pub fn full_travel_duration(&self) -> TravelDuration {
        self.full_travel_duration
    }

    /// Returns the configured "my" preset duration.
    #[must_use]
    pub fn my_position_duration(&self) -> TravelDuration {
        self.my_position_duration
    }

    /// Applies a state change.
    ///
    /// Returns true if the state was actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match *change {
            StateChange::CurrentPosition(p) => replace(&mut self.current_position, p),
            StateChange::TargetPosition(p) => replace(&mut self.target_position, p),
            StateChange::Motion(m) => replace(&mut self.motion_state, m),
            StateChange::FullTravelDuration(d) => replace(&mut self.full_travel_duration, d),
            StateChange::MyPositionDuration(d) => replace(&mut self.my_position_duration, d),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl Default for CoveringState {
    fn default() -> Self {
        Self::new(Position::OPEN)
    }
}
