// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Motor command vocabulary.
//!
//! Coverings only understand three abstract intents: open, close and stop.
//! Devices advertise the concrete command names they accept, and some
//! vendors expose `rollUp` / `rollOut` instead of `open` / `close`.
//!
//! # Translation table
//!
//! | Intent | Primary | Fallback |
//! |--------|---------|----------|
//! | [`MotorIntent::Open`] | `open` | `rollUp` |
//! | [`MotorIntent::Close`] | `close` | `rollOut` |
//! | [`MotorIntent::Stop`] | `stop` | none |
//!
//! The fallback is only used when the primary name is missing from the
//! device's [`CommandSet`] and the fallback name is present. Otherwise the
//! primary name is sent as-is and the device layer may reject it.
//!
//! # Examples
//!
//! ```
//! use covermotion::command::{CommandSet, MotorIntent, translate};
//!
//! let vendor = CommandSet::from_names(["rollUp", "rollOut", "stop"]);
//! assert_eq!(translate(MotorIntent::Open, &vendor), "rollUp");
//!
//! let standard = CommandSet::from_names(["open", "close", "stop"]);
//! assert_eq!(translate(MotorIntent::Open, &standard), "open");
//! ```

mod remote;

use std::collections::BTreeSet;
use std::fmt;

pub use remote::RemoteButton;

/// An abstract motor instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MotorIntent {
    /// Drive toward fully open.
    Open,
    /// Drive toward fully closed.
    Close,
    /// Halt the motor.
    Stop,
}

impl MotorIntent {
    /// Returns the standard command name.
    #[must_use]
    pub const fn primary(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Stop => "stop",
        }
    }

    /// Returns the vendor alias, if the intent has one.
    #[must_use]
    pub const fn fallback(self) -> Option<&'static str> {
        match self {
            Self::Open => Some("rollUp"),
            Self::Close => Some("rollOut"),
            Self::Stop => None,
        }
    }
}

impl fmt::Display for MotorIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.primary())
    }
}

/// The set of command names a device reports as supported.
///
/// An empty set means the capabilities are unknown; every intent then
/// resolves to its primary name.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CommandSet(BTreeSet<String>);

impl CommandSet {
    /// Creates an empty command set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a command set from a list of names.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// The standard `open` / `close` / `stop` vocabulary.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_names(["open", "close", "stop"])
    }

    /// Returns true if the device accepts `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Returns true if no command names are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the command names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Resolves an intent to the name this device should receive.
    #[must_use]
    pub fn resolve(&self, intent: MotorIntent) -> ResolvedCommand {
        let primary = intent.primary();
        match intent.fallback() {
            Some(alias) if !self.contains(primary) && self.contains(alias) => ResolvedCommand {
                intent,
                name: alias,
                is_fallback: true,
            },
            _ => ResolvedCommand {
                intent,
                name: primary,
                is_fallback: false,
            },
        }
    }
}

/// An intent mapped onto a device's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCommand {
    /// The abstract intent.
    pub intent: MotorIntent,
    /// The command name to send.
    pub name: &'static str,
    /// Whether the vendor alias replaced the standard name.
    pub is_fallback: bool,
}

/// Maps an intent to the command name supported by a device.
#[must_use]
pub fn translate(intent: MotorIntent, supported: &CommandSet) -> &'static str {
    supported.resolve(intent).name
}
