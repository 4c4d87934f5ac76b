// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting covering events.

use tokio::sync::broadcast;

use super::CoveringEvent;

/// Broadcasts covering events to any number of subscribers.
///
/// Subscribers that fall more than `capacity` events behind receive
/// `RecvError::Lagged` and miss the oldest events.
///
/// # Examples
///
/// ```
/// use covermotion::event::{CoveringEvent, CoveringId, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(CoveringEvent::CoveringRemoved {
///     covering_id: CoveringId::new(),
/// });
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoveringEvent>,
}

impl EventBus {
    /// Default channel capacity.
    ///
    /// A full 0-100% run produces a little over a hundred events, so the
    /// default leaves room for two coverings moving at once before a slow
    /// subscriber starts lagging.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus buffering up to `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoveringEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// Events published without subscribers are discarded.
    pub fn publish(&self, event: CoveringEvent) {
        // No subscribers is not an error for a fire-and-forget publisher
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
