// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A single simulated movement.

use std::time::Duration;

use crate::command::MotorIntent;
use crate::types::{Direction, Position, TravelDuration};

/// One continuous simulated motion from a start to a target position.
///
/// Start and target are fixed for the lifetime of the episode. The covering
/// moves 1% per [`step_interval`](Self::step_interval), so a partial move
/// takes the proportional share of the full travel duration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use covermotion::motion::MotionEpisode;
/// use covermotion::types::{Direction, Position, TravelDuration};
///
/// let episode = MotionEpisode::plan(
///     Position::CLOSED,
///     Position::new(50).unwrap(),
///     TravelDuration::FULL_TRAVEL_DEFAULT,
///     true,
/// )
/// .unwrap();
///
/// assert_eq!(episode.direction(), Direction::Opening);
/// assert_eq!(episode.steps(), 50);
/// assert_eq!(episode.step_interval(), Duration::from_millis(260));
/// assert_eq!(episode.total_duration(), Duration::from_secs(13));
///
/// // Nothing to do when already there
/// assert!(MotionEpisode::plan(
///     Position::OPEN,
///     Position::OPEN,
///     TravelDuration::FULL_TRAVEL_DEFAULT,
///     true,
/// )
/// .is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionEpisode {
    start: Position,
    target: Position,
    direction: Direction,
    travel: TravelDuration,
    self_stops_at_limit: bool,
}

impl MotionEpisode {
    /// Plans a move, or returns `None` if `start == target`.
    ///
    /// `self_stops_at_limit` tells whether the motor halts on its own when
    /// the episode ends at the fully open or fully closed limit.
    #[must_use]
    pub fn plan(
        start: Position,
        target: Position,
        travel: TravelDuration,
        self_stops_at_limit: bool,
    ) -> Option<Self> {
        let direction = match target.cmp(&start) {
            std::cmp::Ordering::Greater => Direction::Opening,
            std::cmp::Ordering::Less => Direction::Closing,
            std::cmp::Ordering::Equal => return None,
        };
        Some(Self {
            start,
            target,
            direction,
            travel,
            self_stops_at_limit,
        })
    }

    /// Returns the position the episode started from.
    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    /// Returns the destination.
    #[must_use]
    pub fn target(&self) -> Position {
        self.target
    }

    /// Returns the direction of travel.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The intent that starts the motor.
    #[must_use]
    pub fn intent(&self) -> MotorIntent {
        self.direction.intent()
    }

    /// Number of 1% steps (and therefore ticks) in the episode.
    #[must_use]
    pub fn steps(&self) -> u8 {
        self.start.distance(self.target)
    }

    /// Delay between two ticks.
    #[must_use]
    pub fn step_interval(&self) -> Duration {
        self.travel.step_interval()
    }

    /// Wall-clock length of the whole episode.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.travel.for_steps(self.steps())
    }

    /// Returns true if the target is the mechanical limit in the direction
    /// of travel.
    #[must_use]
    pub fn ends_at_limit(&self) -> bool {
        match self.direction {
            Direction::Opening => self.target.is_fully_open(),
            Direction::Closing => self.target.is_fully_closed(),
        }
    }

    /// Returns true if arrival must be followed by an explicit stop.
    #[must_use]
    pub fn needs_stop_on_arrival(&self) -> bool {
        !(self.ends_at_limit() && self.self_stops_at_limit)
    }
}
