// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session state and inbound frame dispatch.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::{mpsc, watch};

use super::BridgeConfig;
use crate::event::{BridgeEvent, EventBus};
use crate::protocol::{ConnectionHandler, ConnectionState, InboundMessage, Outbound, ResourceUpdate};
use crate::resource::{Resource, ResourceRegistry};
use crate::subscription::CallbackSet;
use crate::weather::Weather;

/// Work handed from the dispatcher to the notifier task.
#[derive(Debug)]
pub(crate) enum Notification {
    /// A resource's state was replaced; run its callbacks.
    Resource(Arc<Resource>),
    /// The weather model changed; run the weather listeners.
    Weather,
}

/// Receiving end of the notification queue.
pub(crate) type NotificationQueue = mpsc::UnboundedReceiver<Notification>;

/// State of one bridge session.
///
/// Mutated only by [`Session::dispatch`] and the connection callbacks, which
/// the connection task calls in frame order.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) registry: ResourceRegistry,
    raw_model: RwLock<Option<Value>>,
    initialized: watch::Sender<bool>,
    ext_commands: RwLock<BTreeSet<String>>,
    weather: RwLock<Option<Weather>>,
    pub(crate) weather_listeners: CallbackSet,
    outbound: RwLock<Outbound>,
    pub(crate) events: EventBus,
    connection: watch::Sender<ConnectionState>,
    updates: RwLock<mpsc::UnboundedSender<Notification>>,
}

impl Session {
    pub(crate) fn new(config: &BridgeConfig) -> (Self, NotificationQueue) {
        let (updates, queue) = mpsc::unbounded_channel();
        let session = Self {
            registry: ResourceRegistry::new(),
            raw_model: RwLock::new(None),
            initialized: watch::Sender::new(false),
            ext_commands: RwLock::new(config.ext_commands.iter().cloned().collect()),
            weather: RwLock::new(None),
            weather_listeners: CallbackSet::new(),
            outbound: RwLock::new(Outbound::detached()),
            events: EventBus::with_capacity(config.event_capacity),
            connection: watch::Sender::new(ConnectionState::Disconnected),
            updates: RwLock::new(updates),
        };
        (session, queue)
    }

    // =========================================================================
    // Inbound frames
    // =========================================================================

    /// Decodes and applies one text frame. Malformed frames are logged and
    /// dropped.
    pub(crate) fn dispatch(&self, text: &str) {
        match InboundMessage::parse(text) {
            Ok(message) => {
                tracing::trace!(op = message.op(), "Frame received");
                self.apply(message);
            }
            Err(e) => tracing::warn!(error = %e, "Dropping malformed frame"),
        }
    }

    fn apply(&self, message: InboundMessage) {
        match message {
            InboundMessage::InitialData(frame) => self.on_initial_data(frame),
            InboundMessage::DataUpdate(updates) => self.on_data_update(updates),
            InboundMessage::Modifications(names) => self.on_modifications(names),
            InboundMessage::SetWeather(data) => self.on_set_weather(&data),
            InboundMessage::Unknown(op) => tracing::debug!(op, "Ignoring frame"),
        }
    }

    fn on_initial_data(&self, frame: Value) {
        let outbound = self.outbound();
        let mut raw_model = self.raw_model.write();

        if raw_model.is_some() {
            drop(raw_model);
            self.registry.refresh(&outbound);
            self.initialized.send_replace(true);
            tracing::debug!(
                count = self.registry.len(),
                "Repeated snapshot, resources refreshed in place"
            );
            return;
        }

        let count = frame
            .get("resources")
            .and_then(Value::as_object)
            .map_or(0, |resources| self.registry.rebuild(resources, &outbound));
        *raw_model = Some(frame);
        drop(raw_model);

        self.initialized.send_replace(true);
        self.events.publish(BridgeEvent::ResourcesLoaded { count });
        tracing::info!(count, "Resources loaded");
    }

    fn on_data_update(&self, updates: Vec<ResourceUpdate>) {
        for ResourceUpdate { id, state } in updates {
            let Some(resource) = self.registry.get(id) else {
                tracing::trace!(resource_id = %id, "Update for unknown resource ignored");
                continue;
            };
            resource.set_state(state);
            tracing::debug!(resource_id = %id, "Resource state replaced");
            self.events.publish(BridgeEvent::ResourceUpdated { id });
            self.notify(Notification::Resource(resource));
        }
    }

    fn on_modifications(&self, names: BTreeSet<String>) {
        let added = {
            let mut known = self.ext_commands.write();
            names.into_iter().filter(|name| known.insert(name.clone())).count()
        };
        if added > 0 {
            tracing::debug!(added, "Custom commands discovered");
            self.events.publish(BridgeEvent::ExtCommandsChanged);
        }
    }

    fn on_set_weather(&self, data: &Value) {
        let Some(data) = data.as_object() else {
            tracing::warn!("Dropping weather frame without a data object");
            return;
        };
        self.weather
            .write()
            .get_or_insert_default()
            .update_from_bridge(data);
        tracing::debug!("Weather updated");
        self.events.publish(BridgeEvent::WeatherUpdated);
        self.notify(Notification::Weather);
    }

    fn notify(&self, notification: Notification) {
        if self.updates.read().send(notification).is_err() {
            tracing::trace!("Notification queue closed");
        }
    }

    /// Runs the callbacks a notification stands for.
    pub(crate) fn deliver(&self, notification: Notification) {
        match notification {
            Notification::Resource(resource) => {
                resource.publish_update();
            }
            Notification::Weather => {
                self.weather_listeners.notify();
            }
        }
    }

    /// Replaces the notification queue, returning the new receiving end.
    pub(crate) fn renew_queue(&self) -> NotificationQueue {
        let (updates, queue) = mpsc::unbounded_channel();
        *self.updates.write() = updates;
        queue
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub(crate) fn outbound(&self) -> Outbound {
        self.outbound.read().clone()
    }

    /// Points the session and every resource at a new connection.
    pub(crate) fn attach(&self, outbound: Outbound) {
        self.registry.refresh(&outbound);
        *self.outbound.write() = outbound;
    }

    pub(crate) fn reset_initialized(&self) {
        self.initialized.send_replace(false);
    }

    pub(crate) fn is_initialized(&self) -> bool {
        *self.initialized.borrow()
    }

    pub(crate) fn watch_initialized(&self) -> watch::Receiver<bool> {
        self.initialized.subscribe()
    }

    pub(crate) fn raw_model(&self) -> Option<Value> {
        self.raw_model.read().clone()
    }

    pub(crate) fn ext_commands(&self) -> Vec<String> {
        self.ext_commands.read().iter().cloned().collect()
    }

    pub(crate) fn weather(&self) -> Option<Weather> {
        self.weather.read().clone()
    }

    pub(crate) fn connection_state(&self) -> ConnectionState {
        *self.connection.borrow()
    }

    pub(crate) fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.connection.subscribe()
    }

    pub(crate) fn set_connection_state(&self, state: ConnectionState) {
        let previous = self.connection.send_replace(state);
        if previous != state {
            tracing::debug!(?previous, ?state, "Connection state changed");
            self.events.publish(BridgeEvent::ConnectionChanged { state });
        }
    }
}

impl ConnectionHandler for Session {
    fn on_connected(&self, outbound: Outbound) {
        self.attach(outbound);
    }

    fn on_frame(&self, text: &str) {
        self.dispatch(text);
    }

    fn on_state(&self, state: ConnectionState) {
        self.set_connection_state(state);
    }
}
