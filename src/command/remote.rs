// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Virtual remote buttons.

use crate::types::Position;

/// The three buttons of a covering remote.
///
/// Each button is shorthand for a target position; pressing one while the
/// covering moves halts it, like the physical remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RemoteButton {
    /// Fully open.
    Up,
    /// The user preset ("my") position.
    My,
    /// Fully closed.
    Down,
}

impl RemoteButton {
    /// Returns the target position for this button.
    #[must_use]
    pub const fn target(self, my_position: Position) -> Position {
        match self {
            Self::Up => Position::OPEN,
            Self::My => my_position,
            Self::Down => Position::CLOSED,
        }
    }
}
