// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel for [`BridgeEvent`]s.

use tokio::sync::broadcast;

use super::BridgeEvent;

const DEFAULT_CAPACITY: usize = 256;

/// Fan-out of bridge events to any number of receivers.
///
/// Receivers only see events published after they subscribed. A receiver
/// that falls more than the channel capacity behind skips the oldest events
/// and gets `RecvError::Lagged` once.
///
/// # Examples
///
/// ```
/// use nexo_lib::event::{BridgeEvent, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// assert_eq!(bus.publish(BridgeEvent::ResourcesLoaded { count: 12 }), 1);
/// assert_eq!(rx.try_recv().unwrap(), BridgeEvent::ResourcesLoaded { count: 12 });
///
/// let mut late = bus.subscribe();
/// assert!(late.try_recv().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BridgeEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to 256 events per receiver.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a bus buffering up to `capacity` events per receiver.
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sender: broadcast::Sender::new(capacity.max(1)),
        }
    }

    /// Returns a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event and returns how many receivers it reached.
    /// Without receivers the event is dropped.
    pub fn publish(&self, event: BridgeEvent) -> usize {
        tracing::trace!(?event, "Publishing bridge event");
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
