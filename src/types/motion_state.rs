// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Motion state and direction types.

use std::fmt;

use crate::command::MotorIntent;

/// Whether a covering is moving, and which way.
///
/// `Increasing` and `Decreasing` are only ever observed while a simulated
/// episode is running.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum MotionState {
    /// Not moving.
    #[default]
    Stopped,
    /// Opening (position counting up).
    Increasing,
    /// Closing (position counting down).
    Decreasing,
}

impl MotionState {
    /// Returns true while an episode is running.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stopped => "stopped",
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
        };
        f.write_str(s)
    }
}

/// Direction of a single motion episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward 100%.
    Opening,
    /// Toward 0%.
    Closing,
}

impl Direction {
    /// The motion state reported while travelling this way.
    #[must_use]
    pub const fn motion_state(self) -> MotionState {
        match self {
            Self::Opening => MotionState::Increasing,
            Self::Closing => MotionState::Decreasing,
        }
    }

    /// The motor intent that starts travel this way.
    #[must_use]
    pub const fn intent(self) -> MotorIntent {
        match self {
            Self::Opening => MotorIntent::Open,
            Self::Closing => MotorIntent::Close,
        }
    }
}
