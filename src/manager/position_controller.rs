// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Position controller coordinating multiple coverings.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};

use crate::command::{MotorIntent, RemoteButton};
use crate::error::{ConfigError, Error, Result};
use crate::event::{CoveringEvent, CoveringId, EventBus};
use crate::motion::{HoldOutcome, StartOutcome};
use crate::protocol::{CommandDispatcher, CommandSink};
use crate::state::{CoveringState, StateChange};
use crate::store::{PositionStore, StoreKey};
use crate::types::{MotionState, Position, TravelDuration};

use super::covering_config::{CoveringConfig, stored_position, travel_duration};
use super::managed_covering::ManagedCovering;

/// Result of a move request.
///
/// A request that arrives while the covering is moving is not an error: the
/// covering stops where it is and the outcome is [`StartOutcome::Halted`].
pub type MoveOutcome = StartOutcome;

/// Controller for coverings that report no position of their own.
///
/// Each covering gets its own [`MotionSimulator`](crate::motion::MotionSimulator),
/// a command queue in front of the shared [`CommandSink`], and a namespace
/// in the shared [`PositionStore`]. Requests for one covering are handled one
/// at a time; coverings are independent of each other.
///
/// # Examples
///
/// ```no_run
/// use covermotion::error::CommandError;
/// use covermotion::manager::{CoveringConfig, PositionController};
/// use covermotion::protocol::{CommandSink, MotorCommand};
/// use covermotion::store::MemoryStore;
/// use covermotion::types::Position;
///
/// struct Gateway;
///
/// impl CommandSink for Gateway {
///     async fn send(&self, command: &MotorCommand) -> Result<(), CommandError> {
///         println!("{} -> {}", command.device_url, command.name);
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() -> covermotion::Result<()> {
///     let controller = PositionController::new(Gateway, MemoryStore::new());
///
///     let mut events = controller.subscribe();
///     tokio::spawn(async move {
///         while let Ok(event) = events.recv().await {
///             println!("Event: {:?}", event);
///         }
///     });
///
///     let id = controller.add_covering(CoveringConfig::new("io://1234/5678"))?;
///     controller.set_target_position(id, Position::new(40)?).await?;
///     Ok(())
/// }
/// ```
pub struct PositionController<S: CommandSink> {
    /// Managed coverings, keyed by covering ID.
    coverings: Arc<RwLock<HashMap<CoveringId, Arc<ManagedCovering>>>>,
    /// Where motor commands go.
    sink: Arc<S>,
    /// Where positions and durations are persisted.
    store: Arc<dyn PositionStore>,
    /// Event bus for broadcasting covering events.
    event_bus: EventBus,
}

impl<S: CommandSink> PositionController<S> {
    /// Creates a new controller.
    #[must_use]
    pub fn new(sink: S, store: impl PositionStore + 'static) -> Self {
        Self::with_capacity(sink, store, EventBus::DEFAULT_CAPACITY)
    }

    /// Creates a new controller with a custom event bus capacity.
    #[must_use]
    pub fn with_capacity(sink: S, store: impl PositionStore + 'static, event_capacity: usize) -> Self {
        Self {
            coverings: Arc::new(RwLock::new(HashMap::new())),
            sink: Arc::new(sink),
            store: Arc::new(store),
            event_bus: EventBus::with_capacity(event_capacity),
        }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to covering events.
    ///
    /// Every simulated step is published as a
    /// [`CoveringEvent::StateChanged`] carrying the new current position.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoveringEvent> {
        self.event_bus.subscribe()
    }

    /// Returns the number of active event subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.event_bus.subscriber_count()
    }

    // =========================================================================
    // Covering Management
    // =========================================================================

    /// Adds a covering.
    ///
    /// The last known position and durations are restored from the store,
    /// falling back to the configured defaults. A restarted process is never
    /// moving, so the target is reset to the restored position.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a configured or stored duration is outside
    /// [1, 60] seconds or a stored position is outside [0, 100], and
    /// `Error::CoveringExists` if the device URL is already registered.
    pub fn add_covering(&self, config: CoveringConfig) -> Result<CoveringId> {
        config.validate()?;
        let covering_id = config.covering_id();
        if self.coverings.read().contains_key(&covering_id) {
            return Err(Error::CoveringExists);
        }

        let state = self.restore_state(covering_id, &config)?;
        let dispatcher = CommandDispatcher::spawn(
            covering_id,
            Arc::clone(&self.sink),
            config.command_timeout,
            self.event_bus.clone(),
        );
        let covering = Arc::new(ManagedCovering::new(
            config,
            state.clone(),
            Arc::clone(&self.store),
            self.event_bus.clone(),
            dispatcher,
        ));

        {
            let mut coverings = self.coverings.write();
            if coverings.contains_key(&covering_id) {
                return Err(Error::CoveringExists);
            }
            coverings.insert(covering_id, Arc::clone(&covering));
        }

        covering
            .observer
            .persist(StoreKey::TargetPosition, state.target_position().value());

        tracing::info!(
            %covering_id,
            name = covering.config.display_name(),
            position = %state.current_position(),
            full_travel = %state.full_travel_duration(),
            "Covering added"
        );
        self.event_bus.publish(CoveringEvent::CoveringAdded { covering_id, state });

        Ok(covering_id)
    }

    /// Removes a covering, interrupting any running episode and sending
    /// the motor a stop.
    ///
    /// # Returns
    ///
    /// Returns `true` if the covering was found and removed, `false` otherwise.
    pub fn remove_covering(&self, covering_id: CoveringId) -> bool {
        let Some(covering) = self.coverings.write().remove(&covering_id) else {
            return false;
        };

        if let Some(position) = covering.simulator.interrupt() {
            tracing::debug!(%covering_id, %position, "Stopping removed covering");
            covering.observer.send(MotorIntent::Stop);
        }
        self.event_bus
            .publish(CoveringEvent::CoveringRemoved { covering_id });

        true
    }

    /// Returns a list of all covering IDs.
    #[must_use]
    pub fn covering_ids(&self) -> Vec<CoveringId> {
        self.coverings.read().keys().copied().collect()
    }

    /// Returns the number of managed coverings.
    #[must_use]
    pub fn covering_count(&self) -> usize {
        self.coverings.read().len()
    }

    /// Returns the label of a covering, or its device URL.
    #[must_use]
    pub fn display_name(&self, covering_id: CoveringId) -> Option<String> {
        self.coverings
            .read()
            .get(&covering_id)
            .map(|c| c.config.display_name().to_string())
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Returns the current, possibly mid-flight, position of a covering.
    #[must_use]
    pub fn current_position(&self, covering_id: CoveringId) -> Option<Position> {
        self.coverings
            .read()
            .get(&covering_id)
            .map(|c| c.simulator.current_position())
    }

    /// Returns the current state of a covering.
    #[must_use]
    pub fn state(&self, covering_id: CoveringId) -> Option<CoveringState> {
        self.coverings
            .read()
            .get(&covering_id)
            .map(|c| c.simulator.state())
    }

    /// Creates a watch receiver for a covering's state.
    ///
    /// The receiver is notified on every simulated step.
    #[must_use]
    pub fn watch_covering(&self, covering_id: CoveringId) -> Option<watch::Receiver<CoveringState>> {
        self.coverings
            .read()
            .get(&covering_id)
            .map(|c| c.watch_state())
    }

    // =========================================================================
    // Motion
    // =========================================================================

    /// Moves a covering toward `target`.
    ///
    /// - At rest and already at `target`: nothing is sent.
    /// - At rest elsewhere: the open or close command is sent once and the
    ///   position is simulated until it reaches `target`.
    /// - Moving: the covering stops where it is and `target` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::CoveringNotFound` for an unknown covering.
    pub async fn set_target_position(
        &self,
        covering_id: CoveringId,
        target: Position,
    ) -> Result<MoveOutcome> {
        let covering = self.covering(covering_id)?;
        let _gate = covering.gate.lock().await;

        let travel = covering.simulator.state().full_travel_duration();
        let outcome = covering
            .simulator
            .start(target, travel, &covering.listener());

        match outcome {
            StartOutcome::AlreadyThere => {
                tracing::debug!(%covering_id, %target, "Already at target");
            }
            StartOutcome::Started(_) => {
                covering
                    .observer
                    .persist(StoreKey::TargetPosition, target.value());
                covering.publish(StateChange::TargetPosition(target));
            }
            StartOutcome::Halted(position) => {
                covering
                    .observer
                    .persist(StoreKey::CurrentPosition, position.value());
                covering
                    .observer
                    .persist(StoreKey::TargetPosition, position.value());
                covering.publish(StateChange::TargetPosition(position));
            }
        }

        Ok(outcome)
    }

    /// Stops a covering where it is.
    ///
    /// A stop command is sent even when the covering is already at rest.
    /// Returns the position the covering now holds.
    ///
    /// # Errors
    ///
    /// Returns `Error::CoveringNotFound` for an unknown covering.
    pub async fn hold_position(&self, covering_id: CoveringId) -> Result<Position> {
        let covering = self.covering(covering_id)?;
        let _gate = covering.gate.lock().await;

        let previous_target = covering.simulator.state().target_position();
        let HoldOutcome {
            position,
            was_moving,
        } = covering.simulator.hold();
        covering.observer.send(MotorIntent::Stop);

        covering
            .observer
            .persist(StoreKey::CurrentPosition, position.value());
        covering
            .observer
            .persist(StoreKey::TargetPosition, position.value());

        if was_moving {
            covering.publish(StateChange::Motion(MotionState::Stopped));
        }
        if previous_target != position {
            covering.publish(StateChange::TargetPosition(position));
        }

        tracing::info!(%covering_id, %position, was_moving, "Holding position");
        Ok(position)
    }

    /// Presses a virtual remote button.
    ///
    /// Behaves like [`set_target_position`](Self::set_target_position) with
    /// the button's target, so a press during motion stops the covering.
    ///
    /// # Errors
    ///
    /// Returns `Error::CoveringNotFound` for an unknown covering.
    pub async fn press(&self, covering_id: CoveringId, button: RemoteButton) -> Result<MoveOutcome> {
        let my_position = self.covering(covering_id)?.config.my_position;
        let target = button.target(my_position);
        tracing::debug!(%covering_id, ?button, %target, "Remote button pressed");
        self.set_target_position(covering_id, target).await
    }

    // =========================================================================
    // Durations
    // =========================================================================

    /// Changes the full open or close duration.
    ///
    /// The next episode uses the new value; a running one keeps its pace.
    ///
    /// # Errors
    ///
    /// Returns `Error::CoveringNotFound` for an unknown covering.
    pub async fn set_full_travel_duration(
        &self,
        covering_id: CoveringId,
        duration: TravelDuration,
    ) -> Result<()> {
        let covering = self.covering(covering_id)?;
        let _gate = covering.gate.lock().await;

        if covering.simulator.set_full_travel_duration(duration).is_some() {
            covering
                .observer
                .persist(StoreKey::FullTravelDuration, duration.seconds());
            covering.publish(StateChange::FullTravelDuration(duration));
        }
        Ok(())
    }

    /// Changes the duration of a run to the preset position.
    ///
    /// # Errors
    ///
    /// Returns `Error::CoveringNotFound` for an unknown covering.
    pub async fn set_my_position_duration(
        &self,
        covering_id: CoveringId,
        duration: TravelDuration,
    ) -> Result<()> {
        let covering = self.covering(covering_id)?;
        let _gate = covering.gate.lock().await;

        if covering.simulator.set_my_position_duration(duration).is_some() {
            covering
                .observer
                .persist(StoreKey::MyPositionDuration, duration.seconds());
            covering.publish(StateChange::MyPositionDuration(duration));
        }
        Ok(())
    }

    fn covering(&self, covering_id: CoveringId) -> Result<Arc<ManagedCovering>> {
        self.coverings
            .read()
            .get(&covering_id)
            .cloned()
            .ok_or(Error::CoveringNotFound)
    }

    /// Builds the initial state from the store and the configured defaults.
    fn restore_state(
        &self,
        covering_id: CoveringId,
        config: &CoveringConfig,
    ) -> std::result::Result<CoveringState, ConfigError> {
        let namespace = covering_id.to_string();
        let load = |key: StoreKey, default: u8| self.store.get(&namespace, key, default);

        let current = stored_position(
            StoreKey::CurrentPosition.as_str(),
            load(StoreKey::CurrentPosition, config.initial_position.value()),
        )?;
        let full_travel = travel_duration(
            StoreKey::FullTravelDuration.as_str(),
            load(StoreKey::FullTravelDuration, config.full_travel_duration),
        )?;
        let my_position = travel_duration(
            StoreKey::MyPositionDuration.as_str(),
            load(StoreKey::MyPositionDuration, config.my_position_duration),
        )?;

        let stored_target = load(StoreKey::TargetPosition, current.value());
        if stored_target != current.value() {
            tracing::info!(
                %covering_id,
                stored_target,
                position = %current,
                "Discarding unfinished target from previous run"
            );
        }

        Ok(CoveringState::new(current).with_durations(full_travel, my_position))
    }
}

impl<S: CommandSink> Clone for PositionController<S> {
    fn clone(&self) -> Self {
        Self {
            coverings: Arc::clone(&self.coverings),
            sink: Arc::clone(&self.sink),
            store: Arc::clone(&self.store),
            event_bus: self.event_bus.clone(),
        }
    }
}

impl<S: CommandSink> std::fmt::Debug for PositionController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionController")
            .field("coverings", &self.covering_count())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
