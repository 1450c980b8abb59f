// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed resources built from the bridge's resource graph.
//!
//! A [`Resource`] wraps one device descriptor: its id, name, kind, the raw
//! extra fields, and the latest state reported by the bridge. The state is
//! replaced wholesale on every update, so readers always see a complete
//! snapshot.
//!
//! Kind-specific accessors and commands are reached through capability
//! views returned by the `as_*` methods:
//!
//! | View | Kinds |
//! |------|-------|
//! | [`Switch`] | light, dimmer, led, output and their groups |
//! | [`Dimmer`] | dimmer, led, group dimmer, group LED |
//! | [`Blind`] | blind, group blind |
//! | [`Gate`] | gate |
//! | [`Partition`] | partition |
//! | [`Thermostat`] | thermostat |
//! | [`BinarySensor`] | sensor |
//! | [`AnalogSensor`] | analog sensor, temperature, thermostat |
//! | [`TemperatureSensor`] | temperature, thermostat |
//!
//! # Examples
//!
//! ```no_run
//! use nexo_lib::{Bridge, BridgeConfig};
//! use nexo_lib::resource::ResourceKind;
//!
//! # async fn example() -> nexo_lib::Result<()> {
//! let bridge = Bridge::new(BridgeConfig::new("192.168.1.20"))?;
//! bridge.start()?;
//! bridge.wait_for_initial_resources_load(None).await;
//!
//! for light in bridge.get_resources_by_type(ResourceKind::Light) {
//!     if let Some(switch) = light.as_switch() {
//!         if !switch.is_on() {
//!             switch.turn_on().await?;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod blind;
mod dimmer;
mod gate;
mod kind;
mod partition;
mod registry;
mod sensor;
mod switch;
mod thermostat;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::{Map, Value};

pub use blind::Blind;
pub use dimmer::Dimmer;
pub use gate::Gate;
pub use kind::ResourceKind;
pub use partition::Partition;
pub use registry::ResourceRegistry;
pub use sensor::{AnalogSensor, BinarySensor, TemperatureSensor};
pub use switch::Switch;
pub use thermostat::Thermostat;

use crate::command::Command;
use crate::error::{ResourceError, Result};
use crate::protocol::Outbound;
use crate::subscription::{Callback, CallbackSet, SubscriptionId};
use crate::types::ResourceId;

/// Descriptor keys that are modeled explicitly and not kept as attributes.
const CORE_KEYS: [&str; 4] = ["id", "type", "name", "state"];

#[derive(Debug)]
struct StateSnapshot {
    value: Arc<Value>,
    updated_at: DateTime<Utc>,
}

/// One device or group known to the bridge.
pub struct Resource {
    id: ResourceId,
    name: String,
    kind: ResourceKind,
    attributes: Map<String, Value>,
    state: RwLock<StateSnapshot>,
    outbound: RwLock<Outbound>,
    callbacks: CallbackSet,
}

impl Resource {
    /// Builds a resource from a descriptor of the `initial_data` snapshot.
    ///
    /// # Errors
    ///
    /// Returns a `ResourceError` when the descriptor has no usable id or
    /// type, names an unsupported kind, or is a binary sensor that has not
    /// reported a state yet.
    pub fn from_descriptor(raw: &Value, outbound: Outbound) -> std::result::Result<Self, ResourceError> {
        let type_name = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ResourceError::MissingType)?;
        let id = raw
            .get("id")
            .and_then(ResourceId::from_value)
            .ok_or(ResourceError::MissingId)?;
        let mode = raw.get("mode").and_then(Value::as_i64);
        let kind = ResourceKind::resolve(type_name, mode)?;

        let state = raw.get("state").cloned();
        if kind == ResourceKind::BinarySensor && state.is_none() {
            return Err(ResourceError::MissingState(id.value()));
        }

        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let attributes = raw
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(key, _)| !CORE_KEYS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id,
            name,
            kind,
            attributes,
            state: RwLock::new(StateSnapshot {
                value: Arc::new(state.unwrap_or(Value::Null)),
                updated_at: Utc::now(),
            }),
            outbound: RwLock::new(outbound),
            callbacks: CallbackSet::new(),
        })
    }

    /// Returns the resource id.
    #[must_use]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resource kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns an extra descriptor field such as `min`, `max` or `ios`.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Returns all extra descriptor fields.
    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns the member list of a group resource.
    #[must_use]
    pub fn members(&self) -> Option<&Value> {
        if self.kind.is_group() {
            self.attributes.get("ios")
        } else {
            None
        }
    }

    /// Returns the latest state snapshot.
    ///
    /// `Value::Null` if the bridge has not reported a state yet.
    #[must_use]
    pub fn state(&self) -> Arc<Value> {
        Arc::clone(&self.state.read().value)
    }

    /// Returns when the state was last replaced.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.state.read().updated_at
    }

    /// Returns whole seconds elapsed since the last state replacement.
    #[must_use]
    pub fn seconds_since_update(&self) -> i64 {
        (Utc::now() - self.updated_at()).num_seconds()
    }

    /// Replaces the state.
    pub(crate) fn set_state(&self, state: Value) {
        *self.state.write() = StateSnapshot {
            value: Arc::new(state),
            updated_at: Utc::now(),
        };
    }

    /// Points the resource at a new connection.
    pub(crate) fn set_outbound(&self, outbound: Outbound) {
        *self.outbound.write() = outbound;
    }

    #[cfg(test)]
    pub(crate) fn outbound(&self) -> Outbound {
        self.outbound.read().clone()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Registers a change callback. Registering the same callback twice is a
    /// no-op and returns the original id.
    pub fn register_callback(&self, callback: &Callback) -> SubscriptionId {
        self.callbacks.register(callback)
    }

    /// Removes a change callback. Removing an unknown callback is a no-op.
    pub fn remove_callback(&self, callback: &Callback) -> bool {
        self.callbacks.remove(callback)
    }

    /// Registers a closure as a change callback.
    pub fn on_change<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callbacks.subscribe(callback)
    }

    /// Removes a callback by subscription id.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Invokes every registered callback.
    pub(crate) fn publish_update(&self) -> usize {
        tracing::trace!(
            resource_id = %self.id,
            kind = %self.kind,
            callbacks = self.callbacks.len(),
            "Notifying subscribers"
        );
        self.callbacks.notify()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Sends a command addressed to this resource on the current connection.
    ///
    /// Failures are logged at error level before being returned, so callers
    /// may ignore the result.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` when no connection is attached, or the
    /// protocol error raised while writing the frame.
    pub async fn send_command<C>(&self, command: &C) -> Result<()>
    where
        C: Command + Sync,
    {
        let result = self.try_send(command).await;
        match &result {
            Ok(()) => tracing::debug!(
                resource_id = %self.id,
                command = command.name(),
                "Command sent"
            ),
            Err(e) => tracing::error!(
                resource_id = %self.id,
                command = command.name(),
                error = %e,
                "Failed to send command"
            ),
        }
        result
    }

    async fn try_send<C>(&self, command: &C) -> Result<()>
    where
        C: Command + Sync,
    {
        let frame = command.encode(self.id)?;
        let outbound = self.outbound.read().clone();
        outbound.send(frame).await
    }

    // =========================================================================
    // State helpers
    // =========================================================================

    /// Reads an integer field of the state.
    ///
    /// Accepts integers, floats (rounded), booleans and numeric strings.
    #[must_use]
    pub fn state_i64(&self, key: &str) -> Option<i64> {
        self.state.read().value.get(key).and_then(lenient_i64)
    }

    /// Reads a flag of the state. Numbers are true when non-zero.
    #[must_use]
    pub fn state_flag(&self, key: &str) -> Option<bool> {
        self.state.read().value.get(key).and_then(lenient_bool)
    }

    // =========================================================================
    // Capability views
    // =========================================================================

    /// On/off view for switchable kinds.
    #[must_use]
    pub fn as_switch(&self) -> Option<Switch<'_>> {
        self.kind.is_switchable().then(|| Switch::new(self))
    }

    /// Brightness view for dimmable kinds.
    #[must_use]
    pub fn as_dimmer(&self) -> Option<Dimmer<'_>> {
        self.kind.is_dimmable().then(|| Dimmer::new(self))
    }

    /// Blind view for blinds and blind groups.
    #[must_use]
    pub fn as_blind(&self) -> Option<Blind<'_>> {
        self.kind.is_blind().then(|| Blind::new(self))
    }

    /// Gate view.
    #[must_use]
    pub fn as_gate(&self) -> Option<Gate<'_>> {
        (self.kind == ResourceKind::Gate).then(|| Gate::new(self))
    }

    /// Alarm partition view.
    #[must_use]
    pub fn as_partition(&self) -> Option<Partition<'_>> {
        (self.kind == ResourceKind::Partition).then(|| Partition::new(self))
    }

    /// Thermostat view.
    #[must_use]
    pub fn as_thermostat(&self) -> Option<Thermostat<'_>> {
        (self.kind == ResourceKind::Thermostat).then(|| Thermostat::new(self))
    }

    /// Binary sensor view.
    #[must_use]
    pub fn as_binary_sensor(&self) -> Option<BinarySensor<'_>> {
        (self.kind == ResourceKind::BinarySensor).then(|| BinarySensor::new(self))
    }

    /// Numeric reading view.
    #[must_use]
    pub fn as_analog_sensor(&self) -> Option<AnalogSensor<'_>> {
        self.kind.is_analog().then(|| AnalogSensor::new(self))
    }

    /// Temperature reading view.
    #[must_use]
    pub fn as_temperature_sensor(&self) -> Option<TemperatureSensor<'_>> {
        self.kind.is_temperature().then(|| TemperatureSensor::new(self))
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f.abs() > 0.0),
        Value::String(s) => match s.trim() {
            "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde_json::Value;

    use super::Resource;
    use crate::protocol::Outbound;

    /// Builds a detached resource from a JSON descriptor.
    pub(crate) fn resource(raw: &Value) -> Resource {
        Resource::from_descriptor(raw, Outbound::detached()).unwrap()
    }

    /// Attaches a connection that acknowledges and records every frame.
    pub(crate) fn record_frames(resource: &Resource) -> Arc<Mutex<Vec<Value>>> {
        let (outbound, mut rx) = Outbound::channel(16);
        resource.set_outbound(outbound);
        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&frames);
        tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                let (text, ack) = frame.into_parts();
                sink.lock().push(serde_json::from_str(&text).unwrap());
                ack.complete(Ok(()));
            }
        });
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{record_frames, resource};
    use super::*;
    use crate::command::SwitchCommand;
    use crate::error::Error;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn descriptor_fields() {
        let r = resource(&json!({
            "id": 4, "type": "group_blind", "name": "Front",
            "state": {"blind_level": 20}, "ios": [1, 2], "time_up": 30
        }));
        assert_eq!(r.id(), ResourceId::new(4));
        assert_eq!(r.name(), "Front");
        assert_eq!(r.kind(), ResourceKind::GroupBlind);
        assert_eq!(r.attribute("time_up"), Some(&json!(30)));
        assert_eq!(r.members(), Some(&json!([1, 2])));
        assert!(r.attribute("state").is_none());
        assert_eq!(r.state_i64("blind_level"), Some(20));
    }

    #[test]
    fn string_id_accepted() {
        let r = resource(&json!({"id": "12", "type": "light", "name": "x", "state": {}}));
        assert_eq!(r.id().value(), 12);
    }

    #[test]
    fn missing_state_defaults_to_null() {
        let r = resource(&json!({"id": 1, "type": "output", "name": "Pump"}));
        assert!(r.state().is_null());
        assert_eq!(r.state_flag("is_on"), None);
    }

    #[test]
    fn sensor_without_state_rejected() {
        let err = Resource::from_descriptor(
            &json!({"id": 9, "type": "sensor", "name": "Door"}),
            Outbound::detached(),
        )
        .unwrap_err();
        assert_eq!(err, ResourceError::MissingState(9));
    }

    #[test]
    fn invalid_descriptors_rejected() {
        let detached = Outbound::detached;
        assert_eq!(
            Resource::from_descriptor(&json!({"id": 1}), detached()).unwrap_err(),
            ResourceError::MissingType
        );
        assert_eq!(
            Resource::from_descriptor(&json!({"type": "light"}), detached()).unwrap_err(),
            ResourceError::MissingId
        );
        assert_eq!(
            Resource::from_descriptor(&json!({"id": 1, "type": "temperature", "mode": 3}), detached())
                .unwrap_err(),
            ResourceError::UnsupportedMode(3)
        );
    }

    #[test]
    fn set_state_replaces_wholesale() {
        let r = resource(&json!({"id": 1, "type": "dimmer", "name": "x",
            "state": {"is_on": 1, "brightness": 80}}));
        let before = r.updated_at();
        r.set_state(json!({"is_on": 0}));

        assert_eq!(*r.state(), json!({"is_on": 0}));
        assert_eq!(r.state_i64("brightness"), None);
        assert!(r.updated_at() >= before);
        assert!(r.seconds_since_update() <= 1);
    }

    #[test]
    fn lenient_readers() {
        assert_eq!(lenient_i64(&json!(2.6)), Some(3));
        assert_eq!(lenient_i64(&json!(true)), Some(1));
        assert_eq!(lenient_i64(&json!(" 7 ")), Some(7));
        assert_eq!(lenient_i64(&json!(null)), None);
        assert_eq!(lenient_bool(&json!(0)), Some(false));
        assert_eq!(lenient_bool(&json!(2)), Some(true));
        assert_eq!(lenient_bool(&json!("1")), Some(true));
        assert_eq!(lenient_bool(&json!([])), None);
    }

    #[test]
    fn views_follow_kind() {
        let light = resource(&json!({"id": 1, "type": "light", "name": "x", "state": {}}));
        assert!(light.as_switch().is_some());
        assert!(light.as_dimmer().is_none());
        assert!(light.as_blind().is_none());

        let thermostat = resource(&json!({"id": 2, "type": "temperature", "mode": 2,
            "name": "x", "state": {}}));
        assert!(thermostat.as_thermostat().is_some());
        assert!(thermostat.as_temperature_sensor().is_some());
        assert!(thermostat.as_analog_sensor().is_some());
        assert!(thermostat.as_switch().is_none());
    }

    #[test]
    fn callbacks_fire_once_per_update() {
        let r = resource(&json!({"id": 1, "type": "light", "name": "x", "state": {}}));
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let cb: Callback = Arc::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        r.register_callback(&cb);
        r.register_callback(&cb);
        assert_eq!(r.callback_count(), 1);

        r.publish_update();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert!(r.remove_callback(&cb));
        r.publish_update();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn detached_send_fails_without_panicking() {
        let r = resource(&json!({"id": 1, "type": "light", "name": "x", "state": {}}));
        let err = r.send_command(&SwitchCommand::On).await.unwrap_err();
        assert!(matches!(err, Error::NotConnected));
    }

    #[tokio::test]
    async fn send_uses_current_outbound() {
        let r = resource(&json!({"id": 3, "type": "output", "name": "x", "state": {}}));
        let frames = record_frames(&r);
        assert!(r.outbound().is_attached());

        r.send_command(&SwitchCommand::Off).await.unwrap();
        assert_eq!(
            frames.lock().as_slice(),
            [json!({"type": "resource", "id": 3, "cmd": {"operation": 0}})]
        );
    }
}
