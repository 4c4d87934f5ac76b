// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-covering command dispatch.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::CommandError;
use crate::event::{CoveringEvent, CoveringId, EventBus};

use super::{CommandSink, MotorCommand};

/// Hands the commands of a single covering to a [`CommandSink`].
///
/// `dispatch` never blocks. A background task takes commands in the order
/// they were issued and starts an independent delivery for each, so a slow
/// or hanging command never holds back the ones after it. Each delivery is
/// bounded by the timeout, and failures are reported through logging and
/// [`CoveringEvent::CommandFailed`]. The task ends once every handle to the
/// queue is dropped.
#[derive(Debug, Clone)]
pub(crate) struct CommandDispatcher {
    covering_id: CoveringId,
    tx: mpsc::UnboundedSender<MotorCommand>,
}

impl CommandDispatcher {
    /// Spawns the dispatch task for a covering.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn<S: CommandSink>(
        covering_id: CoveringId,
        sink: Arc<S>,
        timeout: Duration,
        event_bus: EventBus,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<MotorCommand>();

        tokio::spawn(async move {
            tracing::debug!(%covering_id, "Starting command dispatcher");

            while let Some(command) = rx.recv().await {
                tokio::spawn(deliver_and_report(
                    Arc::clone(&sink),
                    command,
                    timeout,
                    event_bus.clone(),
                ));
            }

            tracing::debug!(%covering_id, "Command dispatcher stopped");
        });

        Self { covering_id, tx }
    }

    /// Queues a command without waiting for delivery.
    pub(crate) fn dispatch(&self, command: MotorCommand) {
        tracing::debug!(
            covering_id = %self.covering_id,
            command = command.name,
            high_priority = command.priority.is_high(),
            "Sending motor command"
        );
        if self.tx.send(command).is_err() {
            tracing::warn!(
                covering_id = %self.covering_id,
                error = %CommandError::ChannelClosed,
                "Dropped motor command"
            );
        }
    }
}

/// Delivers one command and reports a failure.
async fn deliver_and_report<S: CommandSink>(
    sink: Arc<S>,
    command: MotorCommand,
    timeout: Duration,
    event_bus: EventBus,
) {
    if let Err(e) = deliver(sink.as_ref(), &command, timeout).await {
        tracing::warn!(
            covering_id = %command.covering_id,
            command = command.name,
            error = %e,
            "Failed to send motor command"
        );
        event_bus.publish(CoveringEvent::CommandFailed {
            covering_id: command.covering_id,
            command: command.name.to_string(),
            error: e.to_string(),
        });
    }
}

/// Sends one command, bounded by `timeout`.
async fn deliver<S: CommandSink>(
    sink: &S,
    command: &MotorCommand,
    timeout: Duration,
) -> Result<(), CommandError> {
    match tokio::time::timeout(timeout, sink.send(command)).await {
        Ok(result) => result,
        Err(_) => Err(CommandError::Timeout(
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        )),
    }
}
