// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Covering configuration for the position controller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::CommandSet;
use crate::error::ConfigError;
use crate::event::CoveringId;
use crate::protocol::CommandPriority;
use crate::types::{Position, TravelDuration};

/// Configuration for a managed covering.
///
/// Durations are kept as raw seconds and validated when the covering is
/// added, together with the values restored from the store.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use covermotion::command::CommandSet;
/// use covermotion::manager::CoveringConfig;
///
/// let config = CoveringConfig::new("io://1234-5678/9876543")
///     .with_label("Bedroom shutter")
///     .with_supported_commands(CommandSet::from_names(["rollUp", "rollOut", "stop"]))
///     .with_full_travel_duration(30)
///     .with_command_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.display_name(), "Bedroom shutter");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoveringConfig {
    /// Device address handed to the command sink.
    pub device_url: String,
    /// Optional human-readable name.
    #[serde(default)]
    pub label: Option<String>,
    /// Command names the device accepts.
    #[serde(default)]
    pub supported_commands: CommandSet,
    /// Seconds for a full open or close run, used until a value is stored.
    #[serde(default = "default_full_travel")]
    pub full_travel_duration: u8,
    /// Seconds for a run to the preset, used until a value is stored.
    #[serde(default = "default_my_position_duration")]
    pub my_position_duration: u8,
    /// Target of the "my" remote button.
    #[serde(default = "default_my_position")]
    pub my_position: Position,
    /// Position assumed when nothing is stored yet.
    #[serde(default = "default_initial_position")]
    pub initial_position: Position,
    /// Priority requested for every motor command.
    #[serde(default)]
    pub priority: CommandPriority,
    /// Whether `rollUp` / `rollOut` halt by themselves at the limit.
    #[serde(default = "default_true")]
    pub fallback_self_stops: bool,
    /// Upper bound for a single command delivery.
    #[serde(default = "default_command_timeout")]
    pub command_timeout: Duration,
}

fn default_full_travel() -> u8 {
    TravelDuration::FULL_TRAVEL_DEFAULT.seconds()
}

fn default_my_position_duration() -> u8 {
    TravelDuration::MY_POSITION_DEFAULT.seconds()
}

fn default_my_position() -> Position {
    CoveringConfig::DEFAULT_MY_POSITION
}

fn default_initial_position() -> Position {
    Position::OPEN
}

fn default_true() -> bool {
    true
}

fn default_command_timeout() -> Duration {
    CoveringConfig::DEFAULT_COMMAND_TIMEOUT
}

impl CoveringConfig {
    /// Preset position of the "my" button unless configured otherwise.
    pub const DEFAULT_MY_POSITION: Position = Position::clamped(50);

    /// Default bound for a single command delivery.
    pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new(device_url: impl Into<String>) -> Self {
        Self {
            device_url: device_url.into(),
            label: None,
            supported_commands: CommandSet::new(),
            full_travel_duration: default_full_travel(),
            my_position_duration: default_my_position_duration(),
            my_position: Self::DEFAULT_MY_POSITION,
            initial_position: Position::OPEN,
            priority: CommandPriority::default(),
            fallback_self_stops: true,
            command_timeout: Self::DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Sets a human-readable name.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the command names the device accepts.
    #[must_use]
    pub fn with_supported_commands(mut self, commands: CommandSet) -> Self {
        self.supported_commands = commands;
        self
    }

    /// Sets the default full travel duration in seconds.
    #[must_use]
    pub fn with_full_travel_duration(mut self, seconds: u8) -> Self {
        self.full_travel_duration = seconds;
        self
    }

    /// Sets the default "my" preset duration in seconds.
    #[must_use]
    pub fn with_my_position_duration(mut self, seconds: u8) -> Self {
        self.my_position_duration = seconds;
        self
    }

    /// Sets the "my" preset position.
    #[must_use]
    pub fn with_my_position(mut self, position: Position) -> Self {
        self.my_position = position;
        self
    }

    /// Sets the position assumed when nothing is stored.
    #[must_use]
    pub fn with_initial_position(mut self, position: Position) -> Self {
        self.initial_position = position;
        self
    }

    /// Sets the command priority.
    #[must_use]
    pub fn with_priority(mut self, priority: CommandPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Declares whether the vendor fallback commands self-stop at the limit.
    ///
    /// When false, a stop is also sent after a full open or close driven by
    /// `rollUp` / `rollOut`.
    #[must_use]
    pub fn with_fallback_self_stops(mut self, self_stops: bool) -> Self {
        self.fallback_self_stops = self_stops;
        self
    }

    /// Sets the delivery timeout for a single command.
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Returns the identifier derived from the device URL.
    #[must_use]
    pub fn covering_id(&self) -> CoveringId {
        CoveringId::from_device_url(&self.device_url)
    }

    /// Returns the label if set, otherwise the device URL.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.device_url)
    }

    /// Checks the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTravelDuration` if a duration is outside
    /// [1, 60] seconds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        travel_duration("fullTravelDuration", self.full_travel_duration)?;
        travel_duration("myPositionDuration", self.my_position_duration)?;
        Ok(())
    }
}

/// Validates a duration read from configuration or storage.
pub(crate) fn travel_duration(field: &'static str, seconds: u8) -> Result<TravelDuration, ConfigError> {
    TravelDuration::new(seconds)
        .map_err(|source| ConfigError::InvalidTravelDuration { field, source })
}

/// Validates a position read from storage.
pub(crate) fn stored_position(field: &'static str, value: u8) -> Result<Position, ConfigError> {
    Position::new(value).map_err(|source| ConfigError::InvalidPosition { field, source })
}
