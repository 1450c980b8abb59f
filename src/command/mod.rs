// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nexo command definitions.
//!
//! This module provides typed representations of the commands a resource can
//! send to the bridge. Every resource command travels in the same envelope:
//!
//! ```text
//! {"type":"resource","id":<id>,"cmd":{<fields>}}
//! ```
//!
//! Only the `cmd` field set differs between resource kinds.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Fields |
//! |-------------|---------|--------|
//! | [`SwitchCommand`] | On/off for lights, outputs, LEDs | `operation` |
//! | [`DimmerCommand`] | Brightness or restore last level | `operation`, `brightness` |
//! | [`BlindCommand`] | Move, stop, or position a blind | `blind_op`, `blind_level`, `blind_slope` |
//! | [`GateCommand`] | Toggle a gate | `operation` |
//! | [`PartitionCommand`] | Arm or disarm an alarm partition | `operation`, `password` |
//! | [`ThermostatCommand`] | Power and target temperature | `operation`, `value` |
//! | [`ExtCommand`] | Named vendor action outside the resource model | - |
//!
//! # Examples
//!
//! ```
//! use nexo_lib::command::{Command, DimmerCommand};
//! use nexo_lib::types::ResourceId;
//!
//! let cmd = DimmerCommand::level(300);
//! assert_eq!(
//!     cmd.encode(ResourceId::new(4)).unwrap(),
//!     r#"{"type":"resource","id":4,"cmd":{"operation":1,"brightness":255}}"#
//! );
//!
//! // Zero brightness is the off path
//! assert_eq!(
//!     DimmerCommand::level(0).encode(ResourceId::new(4)).unwrap(),
//!     r#"{"type":"resource","id":4,"cmd":{"operation":0}}"#
//! );
//! ```

mod blind;
mod dimmer;
mod ext;
mod gate;
mod partition;
mod switch;
mod thermostat;

use serde::Serialize;

pub use blind::{BLIND_SLOPE, BlindCommand};
pub use dimmer::DimmerCommand;
pub use ext::ExtCommand;
pub use gate::GateCommand;
pub use partition::PartitionCommand;
pub use switch::SwitchCommand;
pub use thermostat::ThermostatCommand;

use crate::error::{ParseError, Result};
use crate::types::ResourceId;

/// The `cmd` object of a resource command.
///
/// Absent fields are omitted from the wire. Field order matches the order
/// the bridge firmware emits them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandPayload {
    /// Generic operation code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<u8>,
    /// Dimmer brightness (1-255).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    /// Numeric value, used by thermostats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    /// Alarm partition password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Blind operation code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blind_op: Option<u8>,
    /// Blind closed amount (0-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blind_level: Option<u8>,
    /// Blind slat angle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blind_slope: Option<u8>,
}

impl CommandPayload {
    /// A payload carrying only an operation code.
    #[must_use]
    pub fn operation(operation: u8) -> Self {
        Self {
            operation: Some(operation),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct ResourceEnvelope<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    id: ResourceId,
    cmd: &'a CommandPayload,
}

/// A command that can be sent to a Nexo resource.
pub trait Command {
    /// Returns a short name for the command, used in logs.
    fn name(&self) -> &'static str;

    /// Returns the `cmd` fields of the command.
    fn payload(&self) -> CommandPayload;

    /// Serializes the full resource envelope addressed to `id`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if serialization fails.
    fn encode(&self, id: ResourceId) -> Result<String> {
        let payload = self.payload();
        let envelope = ResourceEnvelope {
            kind: "resource",
            id,
            cmd: &payload,
        };
        Ok(serde_json::to_string(&envelope).map_err(ParseError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_omitted() {
        let payload = CommandPayload::operation(1);
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"operation":1}"#
        );
    }

    #[test]
    fn envelope_shape() {
        let json = SwitchCommand::On.encode(ResourceId::new(12)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "resource");
        assert_eq!(value["id"], 12);
        assert!(value["id"].is_i64());
        assert_eq!(value["cmd"]["operation"], 1);
    }
}
