// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `covermotion` - Position tracking for coverings without position feedback.
//!
//! Many motorized blinds, shutters and awnings only understand "open",
//! "close" and "stop" and never report where they are. This library makes
//! them addressable by percentage: it times the motor from a known full
//! travel duration, stops it at the right moment, and publishes a simulated
//! position every step along the way.
//!
//! # Supported Features
//!
//! - **Percentage positioning**: move to any position between 0 (closed)
//!   and 100 (open)
//! - **Stop in place**: a second request while moving halts the covering,
//!   like the physical remote
//! - **Vendor command aliases**: `rollUp` / `rollOut` for devices lacking
//!   `open` / `close`
//! - **Persistence**: last position and durations survive restarts
//! - **Events**: per-step position updates via broadcast and watch channels
//!
//! # Quick Start
//!
//! ```no_run
//! use covermotion::{CoveringConfig, PositionController, Position};
//! use covermotion::error::CommandError;
//! use covermotion::protocol::{CommandSink, MotorCommand};
//! use covermotion::store::MemoryStore;
//!
//! /// Forwards commands to the home-automation gateway.
//! struct Gateway;
//!
//! impl CommandSink for Gateway {
//!     async fn send(&self, command: &MotorCommand) -> Result<(), CommandError> {
//!         println!("{} <- {}", command.device_url, command.name);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> covermotion::Result<()> {
//!     let controller = PositionController::new(Gateway, MemoryStore::new());
//!
//!     let id = controller.add_covering(
//!         CoveringConfig::new("io://1234-5678/9876543").with_full_travel_duration(30),
//!     )?;
//!
//!     // Sends "close" now and "stop" roughly 15 seconds later
//!     controller.set_target_position(id, Position::new(50)?).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Timing Model
//!
//! A full run takes the configured full travel duration; each 1% step takes
//! a hundredth of it. The covering is assumed to start moving when the
//! command is queued. Commands are handed to the sink in issue order, each in
//! its own task, and store writes happen in the background, so neither a
//! slow device nor a slow store delays the simulation.

pub mod command;
pub mod error;
pub mod event;
pub mod manager;
pub mod motion;
pub mod protocol;
pub mod state;
pub mod store;
pub mod types;

pub use command::{CommandSet, MotorIntent, RemoteButton, translate};
pub use error::{CommandError, ConfigError, Error, Result, StoreError, ValueError};
pub use event::{CoveringEvent, CoveringId, EventBus};
pub use manager::{CoveringConfig, MoveOutcome, PositionController};
pub use motion::{MotionEpisode, MotionListener, MotionSimulator, StartOutcome};
pub use protocol::{CommandPriority, CommandSink, MotorCommand};
pub use state::{CoveringState, StateChange};
pub use store::{MemoryStore, PositionStore, StoreKey};
pub use types::{Direction, MotionState, Position, TravelDuration};
