// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Position controller for coordinating multiple coverings.
//!
//! # Overview
//!
//! The [`PositionController`] is the entry point for applications driving
//! coverings that accept open / close / stop but never report a position.
//! It provides:
//!
//! - **Covering management**: add and remove coverings, restoring their last
//!   known position from a [`PositionStore`](crate::store::PositionStore)
//! - **Simulated positioning**: move to any percentage by timing the motor
//! - **State tracking**: state can be queried or watched while moving
//! - **Event system**: subscribe to per-step position events
//!
//! # Examples
//!
//! ## Moving a covering
//!
//! ```no_run
//! use covermotion::error::CommandError;
//! use covermotion::manager::{CoveringConfig, PositionController};
//! use covermotion::protocol::{CommandSink, MotorCommand};
//! use covermotion::store::MemoryStore;
//! use covermotion::types::Position;
//!
//! struct Gateway;
//!
//! impl CommandSink for Gateway {
//!     async fn send(&self, _command: &MotorCommand) -> Result<(), CommandError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> covermotion::Result<()> {
//!     let controller = PositionController::new(Gateway, MemoryStore::new());
//!     let id = controller.add_covering(CoveringConfig::new("io://1234/5678"))?;
//!
//!     controller.set_target_position(id, Position::new(30)?).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Watching a covering
//!
//! ```no_run
//! # use covermotion::error::CommandError;
//! # use covermotion::protocol::{CommandSink, MotorCommand};
//! # struct Gateway;
//! # impl CommandSink for Gateway {
//! #     async fn send(&self, _command: &MotorCommand) -> Result<(), CommandError> { Ok(()) }
//! # }
//! use covermotion::manager::{CoveringConfig, PositionController};
//! use covermotion::store::MemoryStore;
//!
//! # async fn example() -> covermotion::Result<()> {
//! let controller = PositionController::new(Gateway, MemoryStore::new());
//! let id = controller.add_covering(CoveringConfig::new("io://1234/5678"))?;
//!
//! if let Some(mut state_rx) = controller.watch_covering(id) {
//!     tokio::spawn(async move {
//!         while state_rx.changed().await.is_ok() {
//!             let state = state_rx.borrow();
//!             println!("Now at {}", state.current_position());
//!         }
//!     });
//! }
//! # Ok(())
//! # }
//! ```

mod covering_config;
mod managed_covering;
mod position_controller;

pub use covering_config::CoveringConfig;
pub use position_controller::{MoveOutcome, PositionController};
