// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Time-based position simulation.
//!
//! Coverings driven by plain open / close / stop commands never report where
//! they are. A [`MotionSimulator`] fills the gap: it plans a
//! [`MotionEpisode`] from the current position to a target, drives the motor
//! once, then advances the believed position by one percent per step
//! interval until the target is reached or the episode is interrupted.

mod episode;
mod simulator;

pub use episode::MotionEpisode;
pub use simulator::{HoldOutcome, MotionListener, MotionSimulator, StartOutcome};
