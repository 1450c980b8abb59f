// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat commands.

use crate::command::{Command, CommandPayload};
use crate::types::{THERMOSTAT_NO_VALUE, Temperature};

/// Command to control a thermostat.
///
/// Power changes carry the "no value" sentinel so the target temperature is
/// left untouched.
///
/// # Examples
///
/// ```
/// use nexo_lib::command::{Command, ThermostatCommand};
///
/// let on = ThermostatCommand::On.payload();
/// assert_eq!(on.operation, Some(1));
/// assert_eq!(on.value, Some(32767));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermostatCommand {
    /// Switch off, keep the target.
    Off,
    /// Switch on, keep the target.
    On,
    /// Set the target temperature, keeping the given power state.
    SetTarget {
        /// Whether the thermostat stays on.
        on: bool,
        /// New target temperature.
        target: Temperature,
    },
}

impl Command for ThermostatCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Off => "thermostat_off",
            Self::On => "thermostat_on",
            Self::SetTarget { .. } => "thermostat_set_target",
        }
    }

    fn payload(&self) -> CommandPayload {
        let (operation, value) = match self {
            Self::Off => (0, THERMOSTAT_NO_VALUE),
            Self::On => (1, THERMOSTAT_NO_VALUE),
            Self::SetTarget { on, target } => (u8::from(*on), target.tenths()),
        };
        CommandPayload {
            value: Some(value),
            ..CommandPayload::operation(operation)
        }
    }
}
