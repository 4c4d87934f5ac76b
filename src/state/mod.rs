// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Covering state management types.
//!
//! The [`CoveringState`] struct holds the position, target and motion state
//! of a covering, while [`StateChange`] represents individual changes that
//! can be applied to it and published to subscribers.

mod covering_state;
mod state_change;

pub use covering_state::CoveringState;
pub use state_change::StateChange;
