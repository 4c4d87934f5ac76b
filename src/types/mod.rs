// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for covering control.
//!
//! Each type ensures values are within their valid ranges at construction
//! time.
//!
//! # Types
//!
//! - [`Position`] - Covering position (0-100%, 0 = closed)
//! - [`TravelDuration`] - Seconds for a full run (1-60)
//! - [`MotionState`] - Stopped / increasing / decreasing
//! - [`Direction`] - Direction of a single episode

mod motion_state;
mod position;
mod travel_duration;

pub use motion_state::{Direction, MotionState};
pub use position::Position;
pub use travel_duration::TravelDuration;
