// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for covering state changes.
//!
//! The [`EventBus`] uses tokio's broadcast channel so that several
//! subscribers (an accessory bridge, a logger, a persistence mirror) can
//! follow every simulated position step.

mod covering_event;
mod covering_id;
mod event_bus;

pub use covering_event::CoveringEvent;
pub use covering_id::CoveringId;
pub use event_bus::EventBus;
