// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simulated continuous-position state machine.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::command::MotorIntent;
use crate::state::{CoveringState, StateChange};
use crate::types::{MotionState, Position, TravelDuration};

use super::MotionEpisode;

/// Receives the output of a [`MotionSimulator`].
///
/// Callbacks run synchronously while the covering record is locked, so no
/// tick can slip in between an interruption and its caller. Implementations
/// must therefore return quickly and must not call back into the simulator.
pub trait MotionListener: Send + Sync + 'static {
    /// The covering moved one step. `state` already holds the new position.
    fn on_tick(&self, state: &CoveringState);

    /// The episode reached its target. Called after the final tick.
    fn on_arrive(&self, state: &CoveringState);

    /// The motor must receive `intent`.
    fn on_motor_command(&self, intent: MotorIntent);

    /// The motion state changed.
    fn on_motion_changed(&self, _state: &CoveringState) {}

    /// Whether the motor halts by itself at the end of its travel when
    /// driven with `intent`.
    fn self_stops_at_limit(&self, _intent: MotorIntent) -> bool {
        true
    }
}

/// Result of [`MotionSimulator::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The covering already sits at the target; nothing was sent.
    AlreadyThere,
    /// A new episode is running.
    Started(MotionEpisode),
    /// The covering was moving, so it was halted in place at this position
    /// instead of starting a new episode.
    Halted(Position),
}

/// Result of [`MotionSimulator::hold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldOutcome {
    /// Where the covering now rests.
    pub position: Position,
    /// Whether an episode was interrupted.
    pub was_moving: bool,
}

struct ActiveEpisode {
    generation: u64,
    episode: MotionEpisode,
    task: JoinHandle<()>,
}

/// The covering record plus its single live episode, guarded together.
struct Track {
    state: CoveringState,
    episode: Option<ActiveEpisode>,
    generation: u64,
}

impl Track {
    fn owns(&self, generation: u64) -> bool {
        self.episode
            .as_ref()
            .is_some_and(|active| active.generation == generation)
    }

    /// Aborts the live episode, if any, leaving the covering where it is.
    fn halt(&mut self) -> Option<Position> {
        let active = self.episode.take()?;
        active.task.abort();
        self.state.apply(&StateChange::Motion(MotionState::Stopped));
        Some(self.state.current_position())
    }
}

/// Synthesizes a position signal for a covering that reports none.
///
/// The simulator owns the [`CoveringState`] of one covering and at most one
/// running [`MotionEpisode`]. While an episode runs, a tokio task moves the
/// position one percent per step interval and reports each step to a
/// [`MotionListener`].
///
/// Must be used from within a tokio runtime.
pub struct MotionSimulator {
    track: Arc<Mutex<Track>>,
}

impl MotionSimulator {
    /// Creates a simulator for a covering at rest.
    ///
    /// Any motion recorded in `state` is discarded: a fresh simulator never
    /// has a running episode.
    #[must_use]
    pub fn new(mut state: CoveringState) -> Self {
        state.apply(&StateChange::Motion(MotionState::Stopped));
        Self {
            track: Arc::new(Mutex::new(Track {
                state,
                episode: None,
                generation: 0,
            })),
        }
    }

    /// Returns a snapshot of the covering state.
    #[must_use]
    pub fn state(&self) -> CoveringState {
        self.track.lock().state.clone()
    }

    /// Returns the current (possibly mid-flight) position.
    #[must_use]
    pub fn current_position(&self) -> Position {
        self.track.lock().state.current_position()
    }

    /// Returns the motion state.
    #[must_use]
    pub fn motion_state(&self) -> MotionState {
        self.track.lock().state.motion_state()
    }

    /// Returns the running episode, if any.
    #[must_use]
    pub fn active_episode(&self) -> Option<MotionEpisode> {
        self.track.lock().episode.as_ref().map(|active| active.episode)
    }

    /// Changes the full travel duration used by the next episode.
    ///
    /// Returns the new state if anything changed.
    pub fn set_full_travel_duration(&self, duration: TravelDuration) -> Option<CoveringState> {
        let mut track = self.track.lock();
        track
            .state
            .apply(&StateChange::FullTravelDuration(duration))
            .then(|| track.state.clone())
    }

    /// Changes the "my" preset duration.
    ///
    /// Returns the new state if anything changed.
    pub fn set_my_position_duration(&self, duration: TravelDuration) -> Option<CoveringState> {
        let mut track = self.track.lock();
        track
            .state
            .apply(&StateChange::MyPositionDuration(duration))
            .then(|| track.state.clone())
    }

    /// Starts moving toward `target`.
    ///
    /// - While already moving, the covering is halted in place: one stop
    ///   command is emitted and no new episode starts, like pressing a remote
    ///   button a second time.
    /// - At the target already, nothing happens.
    /// - Otherwise the open or close command is emitted once and the tick
    ///   loop starts.
    pub fn start(
        &self,
        target: Position,
        travel: TravelDuration,
        listener: &Arc<dyn MotionListener>,
    ) -> StartOutcome {
        let mut track = self.track.lock();

        if let Some(position) = track.halt() {
            track.state.apply(&StateChange::TargetPosition(position));
            tracing::info!(%position, "Already moving, stopping in place");
            listener.on_motion_changed(&track.state);
            listener.on_motor_command(MotorIntent::Stop);
            return StartOutcome::Halted(position);
        }

        let start = track.state.current_position();
        let direction_intent = if target > start {
            MotorIntent::Open
        } else {
            MotorIntent::Close
        };
        let Some(episode) = MotionEpisode::plan(
            start,
            target,
            travel,
            listener.self_stops_at_limit(direction_intent),
        ) else {
            return StartOutcome::AlreadyThere;
        };

        tracing::info!(
            %start,
            %target,
            steps = episode.steps(),
            step_ms = u64::try_from(episode.step_interval().as_millis()).unwrap_or(u64::MAX),
            "Starting motion episode"
        );

        track.state.apply(&StateChange::TargetPosition(target));
        track
            .state
            .apply(&StateChange::Motion(episode.direction().motion_state()));
        listener.on_motion_changed(&track.state);
        listener.on_motor_command(episode.intent());

        track.generation += 1;
        let generation = track.generation;
        let task = tokio::spawn(run_episode(
            Arc::clone(&self.track),
            generation,
            episode,
            Arc::clone(listener),
        ));
        track.episode = Some(ActiveEpisode {
            generation,
            episode,
            task,
        });

        StartOutcome::Started(episode)
    }

    /// Stops the running episode immediately.
    ///
    /// Returns the position reached, or `None` if nothing was moving. The
    /// arrival callback is not invoked and no command is emitted; the caller
    /// decides what to publish. Calling this on an idle covering is a no-op.
    pub fn interrupt(&self) -> Option<Position> {
        let position = self.track.lock().halt();
        if let Some(position) = position {
            tracing::debug!(%position, "Motion episode interrupted");
        }
        position
    }

    /// Interrupts any episode and makes the current position the target.
    pub fn hold(&self) -> HoldOutcome {
        let mut track = self.track.lock();
        let was_moving = track.halt().is_some();
        let position = track.state.current_position();
        track.state.apply(&StateChange::TargetPosition(position));
        HoldOutcome {
            position,
            was_moving,
        }
    }
}

impl Drop for MotionSimulator {
    fn drop(&mut self) {
        self.track.lock().halt();
    }
}

impl std::fmt::Debug for MotionSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let track = self.track.lock();
        f.debug_struct("MotionSimulator")
            .field("state", &track.state)
            .field("episode", &track.episode.as_ref().map(|a| a.episode))
            .finish_non_exhaustive()
    }
}

/// Tick loop of one episode.
async fn run_episode(
    track: Arc<Mutex<Track>>,
    generation: u64,
    episode: MotionEpisode,
    listener: Arc<dyn MotionListener>,
) {
    let period = episode.step_interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let mut track = track.lock();
        if !track.owns(generation) {
            return;
        }

        let position = track
            .state
            .current_position()
            .step_toward(episode.target());
        track.state.apply(&StateChange::CurrentPosition(position));
        listener.on_tick(&track.state);

        if position == episode.target() {
            track.episode = None;
            track.state.apply(&StateChange::Motion(MotionState::Stopped));
            tracing::info!(%position, "Motion episode arrived");
            listener.on_motion_changed(&track.state);
            listener.on_arrive(&track.state);
            if episode.needs_stop_on_arrival() {
                listener.on_motor_command(MotorIntent::Stop);
            }
            return;
        }
    }
}
