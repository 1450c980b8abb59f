// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge event types.

use crate::protocol::ConnectionState;
use crate::types::ResourceId;

/// Events emitted by a bridge.
///
/// # Examples
///
/// ```
/// use nexo_lib::event::BridgeEvent;
/// use nexo_lib::protocol::ConnectionState;
///
/// let event = BridgeEvent::ConnectionChanged {
///     state: ConnectionState::Connected,
/// };
/// assert!(event.is_connection());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// The connection state changed.
    ConnectionChanged {
        /// The new state.
        state: ConnectionState,
    },

    /// The resource table was (re)built from an `initial_data` snapshot.
    ResourcesLoaded {
        /// Number of resources in the table.
        count: usize,
    },

    /// A resource's state was replaced by a `data_update`.
    ResourceUpdated {
        /// The updated resource.
        id: ResourceId,
    },

    /// New custom command names were discovered.
    ExtCommandsChanged,

    /// The weather model was updated.
    WeatherUpdated,
}

impl BridgeEvent {
    /// Returns the resource id if this is a resource update.
    #[must_use]
    pub fn resource_id(&self) -> Option<ResourceId> {
        match self {
            Self::ResourceUpdated { id } => Some(*id),
            _ => None,
        }
    }

    /// Returns `true` if this is a connection event.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionChanged { .. })
    }

    /// Returns `true` if this is a resource update.
    #[must_use]
    pub fn is_resource_update(&self) -> bool {
        matches!(self, Self::ResourceUpdated { .. })
    }
}
