// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound motor command delivery.
//!
//! The library never talks to hardware itself. Applications provide a
//! [`CommandSink`] that forwards a [`MotorCommand`] to the real device layer
//! (a home automation gateway, a radio bridge, ...). Commands are
//! fire-and-forget: the simulator trusts its timing, not the sink.
//!
//! Each covering owns a dispatcher queue so its commands reach the sink in
//! the order they were issued, while the tick loop never waits for delivery.

mod dispatcher;

pub(crate) use dispatcher::CommandDispatcher;

use std::future::Future;
use std::sync::Arc;

use crate::command::MotorIntent;
use crate::error::CommandError;
use crate::event::CoveringId;

/// Execution priority requested from the device layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CommandPriority {
    /// Regular queueing.
    Normal,
    /// Jump the gateway's queue (the default, since a stop must land fast).
    #[default]
    High,
}

impl CommandPriority {
    /// Returns true for [`CommandPriority::High`].
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

/// A motor command ready for the device layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotorCommand {
    /// The covering the command is for.
    pub covering_id: CoveringId,
    /// Device address understood by the sink.
    pub device_url: Arc<str>,
    /// The abstract intent behind the command.
    pub intent: MotorIntent,
    /// The device-specific command name.
    pub name: &'static str,
    /// Requested execution priority.
    pub priority: CommandPriority,
}

/// Delivers motor commands to the device layer.
///
/// Implementations may be slow or fail; the dispatcher applies a timeout and
/// logs failures without retrying.
///
/// # Examples
///
/// ```
/// use covermotion::error::CommandError;
/// use covermotion::protocol::{CommandSink, MotorCommand};
///
/// struct LogSink;
///
/// impl CommandSink for LogSink {
///     async fn send(&self, command: &MotorCommand) -> Result<(), CommandError> {
///         println!("{} -> {}", command.device_url, command.name);
///         Ok(())
///     }
/// }
/// ```
pub trait CommandSink: Send + Sync + 'static {
    /// Sends a single command.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if the device layer rejects or cannot carry the
    /// command.
    fn send(&self, command: &MotorCommand)
    -> impl Future<Output = Result<(), CommandError>> + Send;
}

impl<S: CommandSink> CommandSink for Arc<S> {
    fn send(
        &self,
        command: &MotorCommand,
    ) -> impl Future<Output = Result<(), CommandError>> + Send {
        S::send(self, command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_priority_is_high() {
        assert_eq!(CommandPriority::default(), CommandPriority::High);
        assert!(CommandPriority::High.is_high());
        assert!(!CommandPriority::Normal.is_high());
    }
}
