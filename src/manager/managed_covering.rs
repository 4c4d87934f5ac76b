// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Internal covering wrapper for the position controller.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use crate::command::{CommandSet, MotorIntent};
use crate::event::{CoveringEvent, CoveringId, EventBus};
use crate::motion::{MotionListener, MotionSimulator};
use crate::protocol::{CommandDispatcher, CommandPriority, MotorCommand};
use crate::state::{CoveringState, StateChange};
use crate::store::{PositionStore, StoreKey, StoreWriter};

use super::covering_config::CoveringConfig;

/// Turns simulator output into persistence, events and motor commands.
pub(crate) struct EpisodeObserver {
    covering_id: CoveringId,
    device_url: Arc<str>,
    commands: CommandSet,
    priority: CommandPriority,
    fallback_self_stops: bool,
    writer: StoreWriter,
    event_bus: EventBus,
    state_tx: watch::Sender<CoveringState>,
    dispatcher: CommandDispatcher,
}

impl EpisodeObserver {
    /// Queues one value for the store.
    pub fn persist(&self, key: StoreKey, value: u8) {
        self.writer.write(key, value);
    }

    /// Notifies watchers and event subscribers of a change.
    pub fn publish(&self, change: StateChange, state: &CoveringState) {
        self.state_tx.send_replace(state.clone());
        self.event_bus.publish(CoveringEvent::state_changed(
            self.covering_id,
            change,
            state.clone(),
        ));
    }

    /// Resolves the intent for this device and queues it.
    pub fn send(&self, intent: MotorIntent) {
        let resolved = self.commands.resolve(intent);
        if resolved.is_fallback {
            tracing::debug!(
                covering_id = %self.covering_id,
                intent = %intent,
                command = resolved.name,
                "Using vendor command alias"
            );
        }
        self.dispatcher.dispatch(MotorCommand {
            covering_id: self.covering_id,
            device_url: Arc::clone(&self.device_url),
            intent,
            name: resolved.name,
            priority: self.priority,
        });
    }
}

impl MotionListener for EpisodeObserver {
    fn on_tick(&self, state: &CoveringState) {
        let position = state.current_position();
        tracing::debug!(covering_id = %self.covering_id, %position, "Tick");
        self.persist(StoreKey::CurrentPosition, position.value());
        self.publish(StateChange::CurrentPosition(position), state);
    }

    fn on_arrive(&self, state: &CoveringState) {
        let position = state.current_position();
        self.persist(StoreKey::TargetPosition, state.target_position().value());
        self.event_bus.publish(CoveringEvent::Arrived {
            covering_id: self.covering_id,
            position,
        });
    }

    fn on_motor_command(&self, intent: MotorIntent) {
        self.send(intent);
    }

    fn on_motion_changed(&self, state: &CoveringState) {
        self.publish(StateChange::Motion(state.motion_state()), state);
    }

    fn self_stops_at_limit(&self, intent: MotorIntent) -> bool {
        !self.commands.resolve(intent).is_fallback || self.fallback_self_stops
    }
}

/// Internal representation of a covering in the controller.
pub(crate) struct ManagedCovering {
    /// Unique covering identifier.
    pub id: CoveringId,
    /// Covering configuration.
    pub config: CoveringConfig,
    /// Position state machine.
    pub simulator: MotionSimulator,
    /// Shared sink for simulator output.
    pub observer: Arc<EpisodeObserver>,
    /// Serializes requests for this covering.
    pub gate: Mutex<()>,
}

impl ManagedCovering {
    /// Creates a managed covering from a restored state.
    ///
    /// Must be called from within a tokio runtime: the store writer is
    /// spawned here.
    pub fn new(
        config: CoveringConfig,
        state: CoveringState,
        store: Arc<dyn PositionStore>,
        event_bus: EventBus,
        dispatcher: CommandDispatcher,
    ) -> Self {
        let id = config.covering_id();
        let (state_tx, _) = watch::channel(state.clone());

        let observer = Arc::new(EpisodeObserver {
            covering_id: id,
            device_url: Arc::from(config.device_url.as_str()),
            commands: config.supported_commands.clone(),
            priority: config.priority,
            fallback_self_stops: config.fallback_self_stops,
            writer: StoreWriter::spawn(id, id.to_string(), store),
            event_bus,
            state_tx,
            dispatcher,
        });

        Self {
            id,
            config,
            simulator: MotionSimulator::new(state),
            observer,
            gate: Mutex::new(()),
        }
    }

    /// Returns the observer as a simulator listener.
    pub fn listener(&self) -> Arc<dyn MotionListener> {
        Arc::clone(&self.observer) as Arc<dyn MotionListener>
    }

    /// Creates a watch receiver for state updates.
    pub fn watch_state(&self) -> watch::Receiver<CoveringState> {
        self.observer.state_tx.subscribe()
    }

    /// Publishes a controller-initiated change using the current state.
    pub fn publish(&self, change: StateChange) {
        self.observer.publish(change, &self.simulator.state());
    }
}

impl std::fmt::Debug for ManagedCovering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedCovering")
            .field("id", &self.id)
            .field("display_name", &self.config.display_name())
            .field("simulator", &self.simulator)
            .finish_non_exhaustive()
    }
}
